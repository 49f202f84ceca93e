//! Local filesystem object store.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use jotter_core::error::{AppError, ErrorKind};
use jotter_core::result::AppResult;
use jotter_core::traits::{ObjectStore, StoreOptions, StoredObject};

use crate::{object_key, public_ref};

/// Stores objects as files under a root directory.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    base_url: String,
}

impl LocalObjectStore {
    /// Create a store rooted at `root_path`, creating the directory if needed.
    pub async fn new(root_path: &str, base_url: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            base_url: base_url.to_string(),
        })
    }

    /// Resolve an object id to a path, rejecting anything that escapes the root.
    fn resolve(&self, public_id: &str) -> AppResult<PathBuf> {
        let relative = Path::new(public_id.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes || public_id.is_empty() {
            return Err(AppError::validation(format!("Invalid object id: {public_id}")));
        }
        Ok(self.root.join(relative))
    }
}

fn io_failure(action: &str, public_id: &str, e: std::io::Error) -> AppError {
    AppError::with_source(
        ErrorKind::ExternalService,
        format!("Failed to {action} object: {public_id}"),
        e,
    )
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn store(&self, data: Bytes, options: StoreOptions) -> AppResult<StoredObject> {
        let public_id = object_key(&options.namespace, &options.filename_hint);
        let full_path = self.resolve(&public_id)?;
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_failure("prepare", &public_id, e))?;
        }
        fs::write(&full_path, &data)
            .await
            .map_err(|e| io_failure("write", &public_id, e))?;

        debug!(public_id = %public_id, bytes = data.len(), "Stored object");
        Ok(StoredObject {
            public_ref: public_ref(&self.base_url, &public_id),
            public_id,
            bytes: data.len() as u64,
            resource_kind: options.resource_kind,
        })
    }

    async fn delete(&self, public_id: &str) -> AppResult<()> {
        let full_path = self.resolve(public_id)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(public_id, "Deleted object");
                Ok(())
            }
            // Already gone counts as deleted.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_failure("delete", public_id, e)),
        }
    }

    async fn fetch_bytes(&self, public_id: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(public_id)?;
        fs::read(&full_path).await.map(Bytes::from).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Object not found: {public_id}"))
            } else {
                io_failure("read", public_id, e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jotter_core::traits::ResourceKind;

    async fn store_in(dir: &tempfile::TempDir) -> LocalObjectStore {
        LocalObjectStore::new(dir.path().to_str().unwrap(), "http://localhost/objects")
            .await
            .unwrap()
    }

    fn options(name: &str) -> StoreOptions {
        StoreOptions {
            namespace: "jotter/users/u1".into(),
            filename_hint: name.into(),
            resource_kind: ResourceKind::Raw,
        }
    }

    #[tokio::test]
    async fn test_store_fetch_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;

        let stored = store
            .store(Bytes::from("hello world"), options("hello.txt"))
            .await
            .unwrap();
        assert!(stored.public_id.starts_with("jotter/users/u1/hello-"));
        assert_eq!(
            stored.public_ref,
            format!("http://localhost/objects/{}", stored.public_id)
        );
        assert_eq!(stored.bytes, 11);

        let bytes = store.fetch_bytes(&stored.public_id).await.unwrap();
        assert_eq!(bytes, Bytes::from("hello world"));

        store.delete(&stored.public_id).await.unwrap();
        let err = store.fetch_bytes(&stored.public_id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        store.delete(&stored.public_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_same_name_gets_distinct_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;
        let a = store.store(Bytes::from("a"), options("x.txt")).await.unwrap();
        let b = store.store(Bytes::from("b"), options("x.txt")).await.unwrap();
        assert_ne!(a.public_id, b.public_id);
    }

    #[tokio::test]
    async fn test_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;
        let err = store.fetch_bytes("../secret").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(store.delete("a/../../b").await.is_err());
    }
}
