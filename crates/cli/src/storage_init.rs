//! Storage connection and verification helpers for the CLI
//!
//! Connection failures are fatal and never retried: this is a one-shot setup tool.

use anyhow::{Context, Result};
use quantify_core::config::StorageConfig;
use quantify_core::{CollectionSpec, DatabaseTarget};
use quantify_storage::CollectionManager;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Create a collection manager and make sure the server answers
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn CollectionManager>> {
    info!(
        provider = %config.provider,
        uri = %config.redacted_uri(),
        "Connecting to storage backend"
    );

    let manager = quantify_storage::create_collection_manager(config)
        .await
        .context("Failed to create storage client")?;

    verify_storage_health(manager.as_ref()).await?;
    Ok(manager)
}

/// Perform health check with detailed diagnostics
pub async fn verify_storage_health(manager: &dyn CollectionManager) -> Result<()> {
    info!("Performing storage backend health check...");

    manager
        .health_check()
        .await
        .context("Storage backend health check failed")?;

    info!("Storage backend is healthy");
    Ok(())
}

/// Difference between a database's collections and a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogDiff {
    /// Catalog collections the database lacks, in catalog order
    pub missing: Vec<String>,
    /// Collections the catalog does not declare, sorted
    pub unexpected: Vec<String>,
}

impl CatalogDiff {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}

/// Compare the collections present in `target` with `catalog`
///
/// Server-internal `system.*` collections (time-series buckets, views) are ignored.
pub async fn verify_catalog(
    manager: &dyn CollectionManager,
    target: &DatabaseTarget,
    catalog: &[CollectionSpec],
) -> Result<CatalogDiff> {
    let present: HashSet<String> = manager
        .list_collection_names(target.name())
        .await
        .with_context(|| format!("Failed to list collections in '{target}'"))?
        .into_iter()
        .filter(|name| !name.starts_with("system."))
        .collect();
    let declared: HashSet<&str> = catalog.iter().map(|spec| spec.name).collect();

    let missing = catalog
        .iter()
        .filter(|spec| !present.contains(spec.name))
        .map(|spec| spec.name.to_string())
        .collect();
    let mut unexpected: Vec<String> = present
        .iter()
        .filter(|name| !declared.contains(name.as_str()))
        .cloned()
        .collect();
    unexpected.sort();

    Ok(CatalogDiff {
        missing,
        unexpected,
    })
}
