use quantify_core::Error as CoreError;
use thiserror::Error;

/// Storage-specific error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Collection already exists with different options: {0}")]
    CollectionConflict(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConnectionFailed(_) => CoreError::connection(err.to_string()),
            StorageError::InvalidConfig(_) => CoreError::config(err.to_string()),
            _ => CoreError::storage(err.to_string()),
        }
    }
}
