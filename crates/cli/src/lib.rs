//! Library interface for the quantify-setup CLI
//!
//! This module exposes the provisioning logic for integration testing while keeping
//! the main binary logic in main.rs.

pub mod provision;
pub mod storage_init;

// Re-export commonly needed types for tests
pub use anyhow::Result;
pub use provision::{ProvisionOutcome, ProvisionReport, SchemaProvisioner};
pub use quantify_core::config::Config;
pub use storage_init::CatalogDiff;
