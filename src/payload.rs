//! # Event Payload Loading
//!
//! The payload is an optional UTF-8 JSON file. A missing path means an empty
//! object; a file that cannot be read or parsed is reported on the diagnostic
//! stream and the invocation continues with an empty object.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::constants::messages;
use crate::error::PayloadError;
use crate::output::OutputSink;

/// Read and parse the payload file
pub fn load_payload(path: &Path) -> Result<Value, PayloadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| PayloadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| PayloadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the payload if configured, falling back to `{}` on any failure
pub fn load_payload_or_default(path: Option<&Path>, output: &dyn OutputSink) -> Value {
    let Some(path) = path else {
        debug!("No payload file configured");
        return empty_payload();
    };

    match load_payload(path) {
        Ok(payload) => {
            debug!(path = %path.display(), "Payload loaded");
            payload
        }
        Err(error) => {
            output.diagnostic_line(&format!("{} {error}", messages::PAYLOAD_READ_ERROR));
            empty_payload()
        }
    }
}

fn empty_payload() -> Value {
    Value::Object(Map::new())
}
