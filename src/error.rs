//! Error types for the text editor.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Storage root {0} is not a directory")]
    InvalidRoot(String),
}

/// Errors raised by a storage backend.
///
/// Only `Hint`, `Forbidden` and `Locked` carry text meant for users; every
/// other kind is reported to clients as a generic internal error.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage failure: {0}")]
    Internal(String),

    #[error("{message}")]
    Hint { message: String, hint: String },

    #[error("Access forbidden: {reason}")]
    Forbidden { reason: String, retry: bool },

    #[error("File is locked: {path}")]
    Locked { path: String },

    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a load or save request was rejected.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("Invalid file path supplied.")]
    InvalidPath,

    #[error("This file is too big to be opened. Please download the file instead.")]
    TooBig { size: u64, limit: u64 },

    #[error("Cannot read the file.")]
    Unreadable,

    #[error("File path not supplied")]
    PathNotSupplied,

    #[error("File mtime not supplied")]
    MtimeNotSupplied,

    #[error("Cannot save file as it has been modified since opening")]
    ModifiedSinceOpening { expected: i64, current: i64 },

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Invalid request body.")]
    InvalidBody,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";
pub const LOCKED_MESSAGE: &str = "The file is locked.";

impl EditError {
    /// The message shown to the client.
    ///
    /// Validation failures use their fixed text. Storage errors go through the
    /// kind table: hints and forbidden reasons are passed on, locks get a fixed
    /// message, anything else is an internal error.
    pub fn user_message(&self) -> String {
        match self {
            EditError::Storage(err) => match err {
                StorageError::Hint { hint, .. } => hint.clone(),
                StorageError::Forbidden { reason, .. } => reason.clone(),
                StorageError::Locked { .. } => LOCKED_MESSAGE.to_string(),
                StorageError::Internal(_) | StorageError::NotFound { .. } | StorageError::Io(_) => {
                    INTERNAL_ERROR_MESSAGE.to_string()
                }
            },
            other => other.to_string(),
        }
    }
}

/// Result type alias for the text editor.
pub type Result<T> = std::result::Result<T, Error>;
