//! Object store trait for file content blobs.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// How the object store should treat the uploaded bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Images, rendered and transformed by the provider.
    Image,
    /// Anything else, stored verbatim.
    Raw,
}

/// Placement hints for [`ObjectStore::store`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Folder-like prefix, e.g. `jotter/users/{user_id}`.
    pub namespace: String,
    /// Original filename, used to derive the stored object's extension.
    pub filename_hint: String,
    /// Resource handling mode.
    pub resource_kind: ResourceKind,
}

/// Result of a successful store call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Stable URL or path that can be handed to clients.
    pub public_ref: String,
    /// Provider identifier used for later fetch/delete.
    pub public_id: String,
    /// Number of bytes stored.
    pub bytes: u64,
    /// Resource handling mode used.
    pub resource_kind: ResourceKind,
}

/// Blob storage for file content.
///
/// Failures are reported as [`ErrorKind::ExternalService`](crate::ErrorKind)
/// so callers can surface them as retryable.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Store bytes and return a reference plus identifier.
    async fn store(&self, data: Bytes, options: StoreOptions) -> AppResult<StoredObject>;

    /// Delete the object with the given identifier.
    async fn delete(&self, public_id: &str) -> AppResult<()>;

    /// Fetch the stored bytes for the given identifier.
    async fn fetch_bytes(&self, public_id: &str) -> AppResult<Bytes>;
}
