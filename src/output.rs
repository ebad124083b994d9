//! # Invocation Output
//!
//! The user-visible output channels of an invocation: the log stream (stdout)
//! carrying handler lines and `{"errorMessage": ...}` records, and the
//! diagnostic stream (stderr) carrying bootstrap diagnostics. Runtime tracing
//! is separate and goes through `tracing`.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Destination of invocation output lines
pub trait OutputSink: Send + Sync {
    /// Write one line to the log stream
    fn log_line(&self, line: &str);

    /// Write one line to the diagnostic stream
    fn diagnostic_line(&self, line: &str);
}

pub type SharedOutput = Arc<dyn OutputSink>;

/// Process stdout/stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StdStreams;

impl OutputSink for StdStreams {
    fn log_line(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout must not take the invocation down with it
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }

    fn diagnostic_line(&self, line: &str) {
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{line}");
        let _ = err.flush();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Log,
    Diagnostic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub stream: Stream,
    pub text: String,
}

/// In-memory sink preserving the interleaving of both streams
#[derive(Debug, Default, Clone)]
pub struct CapturedOutput {
    lines: Arc<Mutex<Vec<OutputLine>>>,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<OutputLine> {
        self.lines.lock().clone()
    }

    pub fn log_lines(&self) -> Vec<String> {
        self.filtered(Stream::Log)
    }

    pub fn diagnostic_lines(&self) -> Vec<String> {
        self.filtered(Stream::Diagnostic)
    }

    fn filtered(&self, stream: Stream) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|line| line.stream == stream)
            .map(|line| line.text.clone())
            .collect()
    }

    fn push(&self, stream: Stream, text: &str) {
        self.lines.lock().push(OutputLine {
            stream,
            text: text.to_string(),
        });
    }
}

impl OutputSink for CapturedOutput {
    fn log_line(&self, line: &str) {
        self.push(Stream::Log, line);
    }

    fn diagnostic_line(&self, line: &str) {
        self.push(Stream::Diagnostic, line);
    }
}
