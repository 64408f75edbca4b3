// Private module - not exposed in public API
mod client;
mod options;

pub(crate) use client::MongoCollectionManager;
