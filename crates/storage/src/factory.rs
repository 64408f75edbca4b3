use crate::error::StorageError;
use crate::mock::MockCollectionManager;
use crate::mongo::MongoCollectionManager;
use crate::CollectionManager;
use quantify_core::{Error, StorageConfig};
use std::sync::Arc;

/// Creates a collection manager based on configuration.
///
/// This is the primary factory function for reaching a database. It returns a trait
/// object that hides implementation details, so the MongoDB backend and the in-memory
/// mock can be used interchangeably.
///
/// # Arguments
/// * `config` - Storage configuration specifying provider type and connection string
///
/// # Errors
/// Returns an error if the provider is unknown or the connection string is invalid.
/// The MongoDB driver connects lazily, so an unreachable server is reported by the
/// first operation (use `health_check` to surface it early).
///
/// # Example
/// ```ignore
/// let config = StorageConfig::default();
/// let manager = create_collection_manager(&config).await?;
/// manager.health_check().await?;
/// ```
pub async fn create_collection_manager(
    config: &StorageConfig,
) -> Result<Arc<dyn CollectionManager>, Error> {
    match config.provider.as_str() {
        "mongodb" => {
            let manager = MongoCollectionManager::connect(config).await?;
            Ok(Arc::new(manager) as Arc<dyn CollectionManager>)
        }
        "mock" => Ok(Arc::new(MockCollectionManager::new()) as Arc<dyn CollectionManager>),
        other => Err(StorageError::InvalidConfig(format!("unknown storage provider '{other}'")).into()),
    }
}
