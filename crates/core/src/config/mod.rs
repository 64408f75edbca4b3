//! Configuration module for quantify-setup
//!
//! This module provides configuration structures and loading mechanisms. Configuration
//! can be loaded from TOML files and/or environment variables.

mod defaults;
mod loading;

#[cfg(test)]
mod tests;

use crate::error::{Error, Result};
use crate::schema::{validate_database_name, DatabaseTarget, ResetPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use defaults::*;

/// Environment variable the Quantify services read the database URI from
pub const DATABASE_URI_ENV: &str = "QUANTIFY_DATABASE_URI";

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.quantify/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".quantify").join("config.toml"))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Provisioning run configuration
    #[serde(default)]
    pub provision: ProvisionConfig,
}

/// Database connection configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend type: "mongodb" (default) or "mock"
    #[serde(default = "default_storage_provider")]
    pub provider: String,

    /// Connection string
    #[serde(default = "default_database_uri")]
    pub uri: String,

    /// Application name reported to the server
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_storage_provider(),
            uri: default_database_uri(),
            app_name: default_app_name(),
        }
    }
}

impl StorageConfig {
    /// Connection string with any `user:password@` section masked
    pub fn redacted_uri(&self) -> String {
        let Some(scheme_end) = self.uri.find("://") else {
            return self.uri.clone();
        };
        let rest = &self.uri[scheme_end + 3..];
        let host_end = rest.find('/').unwrap_or(rest.len());
        match rest[..host_end].rfind('@') {
            Some(at) => format!(
                "{}***REDACTED***{}",
                &self.uri[..scheme_end + 3],
                &rest[at..]
            ),
            None => self.uri.clone(),
        }
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("provider", &self.provider)
            .field("uri", &self.redacted_uri())
            .field("app_name", &self.app_name)
            .finish()
    }
}

/// Provisioning run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// Database the catalog is applied to
    #[serde(default = "default_database_name")]
    pub database: String,

    /// What to do with an existing database
    #[serde(default)]
    pub reset_policy: ResetPolicy,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            database: default_database_name(),
            reset_policy: ResetPolicy::default(),
        }
    }
}

impl ProvisionConfig {
    pub fn target(&self) -> Result<DatabaseTarget> {
        DatabaseTarget::new(self.database.clone())
    }
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        let valid_providers = ["mongodb", "mock"];
        if !valid_providers.contains(&self.storage.provider.as_str()) {
            return Err(Error::config(format!(
                "Invalid storage provider '{}'. Must be one of: {:?}",
                self.storage.provider, valid_providers
            )));
        }

        if self.storage.provider == "mongodb"
            && !(self.storage.uri.starts_with("mongodb://")
                || self.storage.uri.starts_with("mongodb+srv://"))
        {
            return Err(Error::config(format!(
                "storage.uri must start with mongodb:// or mongodb+srv:// (got '{}')",
                self.storage.redacted_uri()
            )));
        }

        if self.storage.app_name.trim().is_empty() {
            return Err(Error::config("storage.app_name must not be empty".to_string()));
        }

        validate_database_name(&self.provision.database)
            .map_err(|e| Error::config(format!("provision.database is invalid: {e}")))?;

        Ok(())
    }
}
