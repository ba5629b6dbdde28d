use std::collections::BTreeMap;

use thiserror::Error;

/// Field name to message, ordered so reports are stable.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotInitialized,
    TaskNotFound,
    ValidationError,
    MalformedInput,
    StorageError,
    ConfigError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::MalformedInput => "MALFORMED_INPUT",
            Self::StorageError => "STORAGE_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct TaskerError {
    pub code: ErrorCode,
    pub message: String,
    /// Per-field messages; only populated for validation failures.
    pub details: FieldErrors,
}

impl TaskerError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: FieldErrors::new(),
        }
    }

    pub fn not_initialized(path: &str) -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            format!("No task store at {path}. Run `tasker init` first."),
        )
    }

    pub fn task_not_found(id: &str) -> Self {
        Self::new(ErrorCode::TaskNotFound, format!("task not found: {id}"))
    }

    pub fn validation(details: FieldErrors) -> Self {
        Self {
            code: ErrorCode::ValidationError,
            message: "validation failed".to_string(),
            details,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedInput, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::TaskNotFound
    }
}

impl From<rusqlite::Error> for TaskerError {
    fn from(e: rusqlite::Error) -> Self {
        Self::storage(e.to_string())
    }
}

impl From<std::io::Error> for TaskerError {
    fn from(e: std::io::Error) -> Self {
        Self::storage(e.to_string())
    }
}

impl From<serde_json::Error> for TaskerError {
    fn from(e: serde_json::Error) -> Self {
        Self::storage(e.to_string())
    }
}
