pub mod json;
pub mod text;

use crate::error::{ErrorCode, TaskerError};

pub const STORAGE_FAILURE: &str = "storage operation failed";

/// Report a command failure in the selected format and return the exit code.
/// Storage causes go to the log; the user only sees a generic message.
pub fn report_error(err: &TaskerError, json_output: bool) -> i32 {
    let generic;
    let shown = if err.code == ErrorCode::StorageError {
        tracing::error!(code = err.code.as_str(), error = %err.message, "{STORAGE_FAILURE}");
        generic = TaskerError::storage(STORAGE_FAILURE);
        &generic
    } else {
        err
    };
    if json_output {
        json::print(&json::error(shown));
    } else {
        text::print_error(shown);
    }
    1
}
