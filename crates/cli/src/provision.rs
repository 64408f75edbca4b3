//! Schema provisioning
//!
//! Applies an ordered collection catalog to one database, after deciding what to do
//! with whatever is already there. The run is linear: resolve the reset policy, then
//! create each collection in catalog order, stopping at the first failure. Collections
//! created before a failure are left in place.

use quantify_core::error::{Error, Result};
use quantify_core::{validate_catalog, CollectionSpec, DatabaseTarget, ResetPolicy};
use quantify_storage::CollectionManager;
use serde::Serialize;
use tracing::{debug, info, warn};

/// What a completed run did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub database: String,
    pub policy: ResetPolicy,
    /// Whether the database was dropped before provisioning
    pub dropped: bool,
    /// Collections created, in creation order
    pub created: Vec<String>,
}

/// Result of a provisioning run that did not fail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProvisionOutcome {
    Success(ProvisionReport),
    /// The database was present and the policy said to leave it alone
    AlreadyExists { database: String },
}

impl ProvisionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Applies a collection catalog through a [`CollectionManager`]
pub struct SchemaProvisioner<'a> {
    manager: &'a dyn CollectionManager,
}

impl<'a> SchemaProvisioner<'a> {
    pub fn new(manager: &'a dyn CollectionManager) -> Self {
        Self { manager }
    }

    /// Provision `target` with `catalog`, honouring `policy`
    ///
    /// Operations are issued one at a time, each awaited before the next. A connection
    /// failure is returned as-is; any other failure while creating a collection is
    /// reported as [`Error::CollectionCreation`] naming that collection.
    pub async fn provision(
        &self,
        target: &DatabaseTarget,
        policy: ResetPolicy,
        catalog: &[CollectionSpec],
    ) -> Result<ProvisionOutcome> {
        validate_catalog(catalog)?;

        let database = target.name();
        info!(
            database,
            %policy,
            collections = catalog.len(),
            "Provisioning database"
        );

        let dropped = match policy {
            ResetPolicy::Drop => {
                info!(database, "Dropping database");
                self.manager.drop_database(database).await?;
                true
            }
            ResetPolicy::AbortIfExists => {
                if self.manager.database_exists(database).await? {
                    warn!(database, "Database already exists");
                    return Ok(ProvisionOutcome::AlreadyExists {
                        database: database.to_string(),
                    });
                }
                false
            }
            ResetPolicy::Proceed => {
                debug!(database, "Keeping existing database state");
                false
            }
        };

        let mut created = Vec::with_capacity(catalog.len());
        for (index, spec) in catalog.iter().enumerate() {
            debug!(
                database,
                collection = spec.name,
                kind = spec.kind.label(),
                step = index + 1,
                total = catalog.len(),
                "Creating collection"
            );

            self.manager
                .create_collection(database, spec)
                .await
                .map_err(|e| creation_error(spec, e))?;

            info!(database, collection = spec.name, "Created collection");
            created.push(spec.name.to_string());
        }

        info!(database, created = created.len(), "Provisioning complete");
        Ok(ProvisionOutcome::Success(ProvisionReport {
            database: database.to_string(),
            policy,
            dropped,
            created,
        }))
    }
}

fn creation_error(spec: &CollectionSpec, err: Error) -> Error {
    if err.is_connection() {
        err
    } else {
        Error::collection_creation(spec.name, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantify_core::catalog;
    use quantify_storage::MockCollectionManager;

    fn quantify() -> DatabaseTarget {
        DatabaseTarget::new("quantify").unwrap()
    }

    #[tokio::test]
    async fn test_invalid_catalog_touches_nothing() {
        let mock = MockCollectionManager::new();
        let duplicated = [catalog()[3], catalog()[3]];

        let result = SchemaProvisioner::new(&mock)
            .provision(&quantify(), ResetPolicy::Drop, &duplicated)
            .await;

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(mock.operations().is_empty());
    }

    #[tokio::test]
    async fn test_creation_error_names_collection() {
        let mock = MockCollectionManager::new();
        mock.fail_collection("tickers");

        let err = SchemaProvisioner::new(&mock)
            .provision(&quantify(), ResetPolicy::Drop, catalog())
            .await
            .unwrap_err();

        match err {
            Error::CollectionCreation { collection, .. } => assert_eq!(collection, "tickers"),
            other => panic!("expected a collection creation error, got {other:?}"),
        }
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = ProvisionOutcome::AlreadyExists {
            database: "quantify".to_string(),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["outcome"], "already_exists");
        assert_eq!(value["database"], "quantify");
        assert!(!outcome.is_success());
    }
}
