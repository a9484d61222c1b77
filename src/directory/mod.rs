//! Subscriber directory access.
//!
//! The directory is an external service owning all subscriber records; this
//! module only defines the record snapshot, the query filter, and the store
//! trait with its HTTP and null implementations.

mod http_store;
mod models;
mod null_store;
mod trait_def;

pub use http_store::HttpDirectoryStore;
pub use models::{Subscriber, SubscriberFilter, SubscriberId};
pub use null_store::NullDirectoryStore;
pub use trait_def::{DirectoryError, DirectoryStore};
