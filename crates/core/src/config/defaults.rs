//! Default values and functions for configuration

use crate::schema::DEFAULT_DATABASE;

// Default constants
pub(crate) const DEFAULT_STORAGE_PROVIDER: &str = "mongodb";
pub(crate) const DEFAULT_DATABASE_URI: &str = "mongodb://localhost:27017";
pub(crate) const DEFAULT_APP_NAME: &str = "Quantify";

pub(crate) fn default_storage_provider() -> String {
    DEFAULT_STORAGE_PROVIDER.to_string()
}

pub(crate) fn default_database_uri() -> String {
    DEFAULT_DATABASE_URI.to_string()
}

pub(crate) fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

pub(crate) fn default_database_name() -> String {
    DEFAULT_DATABASE.to_string()
}
