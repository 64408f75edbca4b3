//! Collection management for storage backends
//!
//! This module provides the trait for database and collection lifecycle operations
//! needed to provision the Quantify catalog.

use async_trait::async_trait;
use quantify_core::error::Result;
use quantify_core::CollectionSpec;

/// Trait for database and collection lifecycle operations
#[async_trait]
pub trait CollectionManager: Send + Sync {
    /// Drop a database. Dropping a database that does not exist succeeds.
    async fn drop_database(&self, database: &str) -> Result<()>;

    /// Names of the databases currently present on the server
    async fn list_database_names(&self) -> Result<Vec<String>>;

    /// Create a collection configured according to its spec
    async fn create_collection(&self, database: &str, spec: &CollectionSpec) -> Result<()>;

    /// Names of the collections in a database
    async fn list_collection_names(&self, database: &str) -> Result<Vec<String>>;

    /// Health check for the storage backend
    async fn health_check(&self) -> Result<()>;

    /// Check if a database exists
    async fn database_exists(&self, database: &str) -> Result<bool> {
        Ok(self
            .list_database_names()
            .await?
            .iter()
            .any(|name| name == database))
    }
}
