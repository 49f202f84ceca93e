//! Per-user storage summary.

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Quota summary returned by the storage-info query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    /// Quota in bytes.
    pub total_storage: i64,
    /// Bytes in use.
    pub used_storage: i64,
    /// `total_storage - used_storage`.
    pub available_storage: i64,
}

impl StorageInfo {
    /// Build the summary from total and used values.
    pub fn new(total_storage: i64, used_storage: i64) -> Self {
        Self {
            total_storage,
            used_storage,
            available_storage: total_storage - used_storage,
        }
    }

    /// Usage percentage (0.0 - 100.0).
    pub fn usage_percent(&self) -> f64 {
        if self.total_storage == 0 {
            0.0
        } else {
            (self.used_storage as f64 / self.total_storage as f64) * 100.0
        }
    }
}

impl From<&User> for StorageInfo {
    fn from(user: &User) -> Self {
        Self::new(user.storage_limit, user.used_storage)
    }
}
