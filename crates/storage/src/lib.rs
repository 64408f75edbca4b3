#![deny(warnings)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod collection_manager;
pub mod error;
mod factory;
mod mock;

// Keep the driver-facing module private
mod mongo;

pub use collection_manager::CollectionManager;
pub use error::StorageError;
pub use factory::create_collection_manager;
pub use mock::{MockCollectionManager, MockOperation};
