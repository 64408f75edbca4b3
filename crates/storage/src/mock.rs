//! Mock collection manager for testing

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use crate::error::StorageError;
use crate::CollectionManager;
use async_trait::async_trait;
use quantify_core::error::{Error, Result};
use quantify_core::CollectionSpec;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

/// A call made against the mock, in the order it was issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    DropDatabase(String),
    ListDatabaseNames,
    CreateCollection {
        database: String,
        collection: String,
    },
    ListCollectionNames(String),
    HealthCheck,
}

#[derive(Debug, Default)]
struct MockData {
    databases: BTreeMap<String, Vec<CollectionSpec>>, // database -> collections in creation order
    operations: Vec<MockOperation>,
    unreachable: bool,
    failing_collections: HashSet<String>,
}

/// In-memory stand-in for a MongoDB server
///
/// Follows the server's observable rules: a database is listed only while it holds at
/// least one collection, dropping a missing database succeeds, and re-creating a
/// collection succeeds only when its options are identical.
#[derive(Clone, Default)]
pub struct MockCollectionManager {
    data: Arc<Mutex<MockData>>,
}

impl MockCollectionManager {
    /// Create a new mock with no databases
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose every operation fails as if the server were down
    pub fn unreachable() -> Self {
        let mock = Self::new();
        mock.data.lock().unwrap().unreachable = true;
        mock
    }

    /// Add a collection without recording an operation
    pub fn seed_collection(&self, database: &str, spec: CollectionSpec) {
        self.data
            .lock()
            .unwrap()
            .databases
            .entry(database.to_string())
            .or_default()
            .push(spec);
    }

    /// Make creation of the named collection fail
    pub fn fail_collection(&self, name: &str) {
        self.data
            .lock()
            .unwrap()
            .failing_collections
            .insert(name.to_string());
    }

    /// Collections of a database, in creation order
    pub fn collections(&self, database: &str) -> Vec<CollectionSpec> {
        self.data
            .lock()
            .unwrap()
            .databases
            .get(database)
            .cloned()
            .unwrap_or_default()
    }

    /// Every operation issued so far
    pub fn operations(&self) -> Vec<MockOperation> {
        self.data.lock().unwrap().operations.clone()
    }

    /// Forget recorded operations, keeping database state
    pub fn clear_operations(&self) {
        self.data.lock().unwrap().operations.clear();
    }

    /// Record an operation, failing if the server is unreachable
    fn record(&self, operation: MockOperation) -> Result<std::sync::MutexGuard<'_, MockData>> {
        let mut data = self.data.lock().unwrap();
        if data.unreachable {
            return Err(StorageError::ConnectionFailed(
                "mock server is unreachable".to_string(),
            )
            .into());
        }
        data.operations.push(operation);
        Ok(data)
    }
}

#[async_trait]
impl CollectionManager for MockCollectionManager {
    async fn drop_database(&self, database: &str) -> Result<()> {
        let mut data = self.record(MockOperation::DropDatabase(database.to_string()))?;
        data.databases.remove(database);
        Ok(())
    }

    async fn list_database_names(&self) -> Result<Vec<String>> {
        let data = self.record(MockOperation::ListDatabaseNames)?;
        Ok(data
            .databases
            .iter()
            .filter(|(_, collections)| !collections.is_empty())
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn create_collection(&self, database: &str, spec: &CollectionSpec) -> Result<()> {
        let mut data = self.record(MockOperation::CreateCollection {
            database: database.to_string(),
            collection: spec.name.to_string(),
        })?;

        if data.failing_collections.contains(spec.name) {
            return Err(Error::storage(format!(
                "simulated failure creating {database}.{}",
                spec.name
            )));
        }

        let collections = data.databases.entry(database.to_string()).or_default();
        match collections.iter().find(|existing| existing.name == spec.name) {
            Some(existing) if existing == spec => Ok(()),
            Some(_) => Err(StorageError::CollectionConflict(format!("{database}.{}", spec.name)).into()),
            None => {
                collections.push(*spec);
                Ok(())
            }
        }
    }

    async fn list_collection_names(&self, database: &str) -> Result<Vec<String>> {
        let data = self.record(MockOperation::ListCollectionNames(database.to_string()))?;
        Ok(data
            .databases
            .get(database)
            .map(|collections| collections.iter().map(|c| c.name.to_string()).collect())
            .unwrap_or_default())
    }

    async fn health_check(&self) -> Result<()> {
        let _data = self.record(MockOperation::HealthCheck)?;
        Ok(())
    }
}
