//! Core types for the Quantify database setup tool
//!
//! This crate provides the foundational pieces shared by the storage backends and
//! the `quantify-setup` binary:
//!
//! - **Schema**: the fixed collection catalog, database targets and reset policies
//! - **Configuration**: layered configuration loading
//! - **Error handling**: unified error types
//!

pub mod config;
pub mod error;
pub mod schema;

// Re-export main types for convenience
pub use config::{Config, ProvisionConfig, StorageConfig};
pub use error::{Error, Result};
pub use schema::{
    catalog, validate_catalog, BsonType, CollectionKind, CollectionSpec, DatabaseTarget,
    FieldRule, Granularity, ResetPolicy, TimeSeriesPolicy, ValidationRule, CATALOG,
    DEFAULT_DATABASE,
};
