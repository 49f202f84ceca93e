//! In-memory object store.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use jotter_core::error::AppError;
use jotter_core::result::AppResult;
use jotter_core::traits::{ObjectStore, StoreOptions, StoredObject};

use crate::{object_key, public_ref};

/// Keeps objects in a hash map. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: DashMap<String, Bytes>,
    base_url: String,
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new(base_url: &str) -> Self {
        Self {
            objects: DashMap::new(),
            base_url: base_url.to_string(),
        }
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether an object with this id exists.
    pub fn contains(&self, public_id: &str) -> bool {
        self.objects.contains_key(public_id)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn store(&self, data: Bytes, options: StoreOptions) -> AppResult<StoredObject> {
        let public_id = object_key(&options.namespace, &options.filename_hint);
        let bytes = data.len() as u64;
        self.objects.insert(public_id.clone(), data);
        Ok(StoredObject {
            public_ref: public_ref(&self.base_url, &public_id),
            public_id,
            bytes,
            resource_kind: options.resource_kind,
        })
    }

    async fn delete(&self, public_id: &str) -> AppResult<()> {
        self.objects.remove(public_id);
        Ok(())
    }

    async fn fetch_bytes(&self, public_id: &str) -> AppResult<Bytes> {
        self.objects
            .get(public_id)
            .map(|b| b.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Object not found: {public_id}")))
    }
}
