//! # jotter-storage
//!
//! [`ObjectStore`](jotter_core::traits::ObjectStore) providers and the
//! factory that picks one from configuration.

pub mod providers;

use std::sync::Arc;

use jotter_core::config::storage::StorageConfig;
use jotter_core::error::AppError;
use jotter_core::result::AppResult;
use jotter_core::traits::ObjectStore;

pub use providers::local::LocalObjectStore;
pub use providers::memory::MemoryObjectStore;

/// Build the object store named by `config.default_provider`.
pub async fn build_object_store(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    match config.default_provider.as_str() {
        "local" => {
            let store =
                LocalObjectStore::new(&config.local.root_path, &config.public_base_url).await?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(MemoryObjectStore::new(&config.public_base_url))),
        other => Err(AppError::configuration(format!(
            "Unknown storage provider '{other}'. Expected one of: local, memory"
        ))),
    }
}

/// Build a `{namespace}/{stem}-{uuid}.{ext}` object key.
pub(crate) fn object_key(namespace: &str, filename_hint: &str) -> String {
    let hint = filename_hint.rsplit(['/', '\\']).next().unwrap_or_default();
    let (stem, ext) = match hint.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (hint, None),
    };
    let stem: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .take(64)
        .collect();
    let stem = if stem.is_empty() { "file".to_string() } else { stem };
    let id = uuid::Uuid::new_v4().simple();
    let namespace = namespace.trim_matches('/');
    match ext {
        Some(ext) => format!("{namespace}/{stem}-{id}.{}", ext.to_ascii_lowercase()),
        None => format!("{namespace}/{stem}-{id}"),
    }
}

/// Join the public base URL and an object key.
pub(crate) fn public_ref(base_url: &str, key: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), key)
}
