//! Object storage and quota configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Object store provider: `"local"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Base URL prefixed to stored object paths when building public references.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Maximum upload size in bytes (default 100 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Storage limit assigned to new users (default 15 GiB).
    #[serde(default = "default_user_quota")]
    pub default_user_quota_bytes: i64,
    /// Local filesystem storage configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            public_base_url: default_public_base_url(),
            max_upload_size_bytes: default_max_upload(),
            default_user_quota_bytes: default_user_quota(),
            local: LocalStorageConfig::default(),
        }
    }
}

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root path for local object storage.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:5000/objects".to_string()
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MB
}

fn default_user_quota() -> i64 {
    16_106_127_360 // 15 GiB
}

fn default_local_root() -> String {
    "./data/objects".to_string()
}
