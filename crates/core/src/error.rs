use thiserror::Error;

/// Result type for quantify operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for quantify operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The database server could not be reached or resolved
    #[error("Connection error: {0}")]
    Connection(String),

    /// A single collection in the catalog could not be created
    #[error("Failed to create collection '{collection}': {message}")]
    CollectionCreation { collection: String, message: String },

    /// Storage related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a collection creation error
    pub fn collection_creation(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CollectionCreation {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// Creates a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Creates an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error means the server was unreachable
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
