//! MongoDB collection manager implementation

use crate::error::StorageError;
use crate::CollectionManager;
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::error::ErrorKind;
use mongodb::options::ClientOptions;
use mongodb::Client;
use quantify_core::error::{Error, Result};
use quantify_core::{CollectionSpec, StorageConfig};
use tracing::debug;

use super::options::collection_options;

/// Server error code for a namespace that already exists
const NAMESPACE_EXISTS: i32 = 48;

/// MongoDB collection manager handling database and collection lifecycle
pub(crate) struct MongoCollectionManager {
    client: Client,
}

impl MongoCollectionManager {
    /// Build a client from the configured connection string
    ///
    /// The driver connects lazily, so an unreachable server surfaces on the first
    /// operation rather than here.
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| map_driver_error("Failed to parse connection string", e))?;
        options.app_name = Some(config.app_name.clone());

        let client = Client::with_options(options)
            .map_err(|e| map_driver_error("Failed to create MongoDB client", e))?;

        debug!(uri = %config.redacted_uri(), "Created MongoDB client");
        Ok(Self { client })
    }
}

#[async_trait]
impl CollectionManager for MongoCollectionManager {
    async fn drop_database(&self, database: &str) -> Result<()> {
        self.client
            .database(database)
            .drop(None)
            .await
            .map_err(|e| map_driver_error(&format!("Failed to drop database {database}"), e))
    }

    async fn list_database_names(&self) -> Result<Vec<String>> {
        self.client
            .list_database_names(None, None)
            .await
            .map_err(|e| map_driver_error("Failed to list databases", e))
    }

    async fn create_collection(&self, database: &str, spec: &CollectionSpec) -> Result<()> {
        self.client
            .database(database)
            .create_collection(spec.name, collection_options(spec))
            .await
            .map_err(|e| {
                map_driver_error(
                    &format!("Failed to create collection {database}.{}", spec.name),
                    e,
                )
            })
    }

    async fn list_collection_names(&self, database: &str) -> Result<Vec<String>> {
        self.client
            .database(database)
            .list_collection_names(None)
            .await
            .map_err(|e| map_driver_error(&format!("Failed to list collections in {database}"), e))
    }

    async fn health_check(&self) -> Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| map_driver_error("MongoDB health check failed", e))?;

        Ok(())
    }
}

/// Classify a driver error so unreachable servers surface as connection errors
fn map_driver_error(context: &str, err: mongodb::error::Error) -> Error {
    let message = format!("{context}: {err}");
    let storage_error = match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::ConnectionPoolCleared { .. } => StorageError::ConnectionFailed(message),
        ErrorKind::InvalidArgument { .. } => StorageError::InvalidConfig(message),
        ErrorKind::Command(command) if command.code == NAMESPACE_EXISTS => {
            StorageError::CollectionConflict(message)
        }
        _ => StorageError::BackendError(message),
    };
    storage_error.into()
}
