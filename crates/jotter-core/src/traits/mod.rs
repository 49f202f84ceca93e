//! Core traits defined in `jotter-core` and implemented by other crates.

pub mod mailer;
pub mod object_store;

pub use mailer::Mailer;
pub use object_store::{ObjectStore, ResourceKind, StoreOptions, StoredObject};
