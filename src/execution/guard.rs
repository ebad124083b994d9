//! Panic containment for handler code

use std::panic::{self, AssertUnwindSafe};

use crate::error::HandlerError;

/// Run handler code, turning a panic into a [`HandlerError`].
///
/// A panic carrying a string payload becomes a bare message, like a raised
/// string; any other payload becomes an error object.
pub(crate) fn run_guarded<F>(body: F) -> Result<(), HandlerError>
where
    F: FnOnce() -> Result<(), HandlerError>,
{
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(result) => result,
        Err(payload) => {
            if let Some(text) = payload.downcast_ref::<&str>() {
                Err(HandlerError::message(*text))
            } else if let Some(text) = payload.downcast_ref::<String>() {
                Err(HandlerError::message(text.clone()))
            } else {
                Err(HandlerError::object("handler panicked"))
            }
        }
    }
}
