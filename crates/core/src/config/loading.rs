//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;
use tracing::debug;

use super::defaults::*;
use super::{global_config_path, Config, DATABASE_URI_ENV};

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: LibConfigBuilder<config::builder::DefaultState>,
    key: &str,
    value: T,
) -> Result<LibConfigBuilder<config::builder::DefaultState>> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `QUANTIFY_` and use double underscores
    /// for nested values. For example:
    /// - `QUANTIFY_PROVISION__RESET_POLICY=proceed`
    ///
    /// `QUANTIFY_DATABASE_URI`, shared with the Quantify data service, overrides
    /// `storage.uri` last.
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = ConfigLib::builder();

        // Section defaults, so a file that only sets one key still deserializes
        let builder = set_config_default(builder, "storage.provider", DEFAULT_STORAGE_PROVIDER)?;
        let builder = set_config_default(builder, "storage.uri", DEFAULT_DATABASE_URI)?;
        let builder = set_config_default(builder, "storage.app_name", DEFAULT_APP_NAME)?;
        let builder = set_config_default(builder, "provision.database", default_database_name())?;
        let mut builder = set_config_default(builder, "provision.reset_policy", "drop")?;

        // Add the config file if it exists
        if path.exists() {
            debug!(path = %path.display(), "Reading configuration file");
            builder = builder.add_source(File::from(path));
        } else {
            debug!(path = %path.display(), "No configuration file, using defaults");
        }

        builder = builder.add_source(
            Environment::with_prefix("QUANTIFY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(uri) = std::env::var(DATABASE_URI_ENV) {
            debug!("Using storage URI from {DATABASE_URI_ENV}");
            builder = builder
                .set_override("storage.uri", uri)
                .map_err(|e| Error::config(format!("Failed to set {DATABASE_URI_ENV}: {e}")))?;
        }

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.quantify/config.toml or custom --config path)
    /// 3. Environment variables (QUANTIFY_*, then QUANTIFY_DATABASE_URI)
    ///
    /// Only the implicit global file may be absent. An explicit path that does not
    /// exist is an error, so a mistyped `--config` never falls back to defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) if !path.is_file() => Err(Error::config(format!(
                "Configuration file not found: {}",
                path.display()
            ))),
            Some(path) => Self::from_file(path),
            None => Self::from_file(&global_config_path()?),
        }
    }
}
