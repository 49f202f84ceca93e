//! Persistence traits consumed by the service layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use jotter_core::result::AppResult;
use jotter_core::types::{PageRequest, PageResponse};
use jotter_entity::file::{CreateFile, File, FileFilter};
use jotter_entity::user::{CreateUser, User};

/// Credential store. Soft-deleted users are invisible to every method.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// List users, newest first.
    async fn list(&self, page: PageRequest) -> AppResult<PageResponse<User>>;

    /// Insert a user. Fails with `Conflict` if the email is taken, including
    /// by a soft-deleted account.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Change the display name.
    async fn update_name(&self, id: Uuid, name: &str) -> AppResult<Option<User>>;

    /// Replace the password hash.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()>;

    /// Store a fresh reset code and clear the verified flag.
    async fn set_reset_otp(
        &self,
        id: Uuid,
        otp: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Mark the outstanding reset code as verified.
    async fn mark_otp_verified(&self, id: Uuid) -> AppResult<()>;

    /// Replace the password hash and clear every reset field in one update.
    async fn reset_password(&self, id: Uuid, password_hash: &str) -> AppResult<()>;

    /// Charge `bytes` against the quota if it fits.
    ///
    /// Returns the updated user, or `None` when the charge would push
    /// `used_storage` past `storage_limit`. The check and the increment are
    /// a single atomic step.
    async fn try_reserve_storage(&self, id: Uuid, bytes: i64) -> AppResult<Option<User>>;

    /// Refund `bytes`, clamping at zero.
    async fn release_storage(&self, id: Uuid, bytes: i64) -> AppResult<()>;

    /// Mark the user as deleted. Returns `false` if no live user matched.
    async fn soft_delete(&self, id: Uuid) -> AppResult<bool>;
}

/// File record store. Every lookup is scoped to an owner.
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a file owned by `owner`.
    async fn find_owned(&self, owner: Uuid, id: Uuid) -> AppResult<Option<File>>;

    /// List the owner's files matching `filter`, in the filter's order.
    async fn list(&self, owner: Uuid, filter: &FileFilter) -> AppResult<Vec<File>>;

    /// Insert a file record.
    async fn create(&self, data: &CreateFile) -> AppResult<File>;

    /// Set the favorite flag.
    async fn set_favorite(&self, owner: Uuid, id: Uuid, favorite: bool)
    -> AppResult<Option<File>>;

    /// Set the private flag together with its password hash.
    async fn set_privacy(
        &self,
        owner: Uuid,
        id: Uuid,
        password_hash: Option<&str>,
    ) -> AppResult<Option<File>>;

    /// Change the display name.
    async fn rename(&self, owner: Uuid, id: Uuid, name: &str) -> AppResult<Option<File>>;

    /// Delete the record. Returns `false` if nothing matched.
    async fn delete(&self, owner: Uuid, id: Uuid) -> AppResult<bool>;

    /// Number of direct children of a folder.
    async fn count_children(&self, owner: Uuid, folder: Uuid) -> AppResult<u64>;
}
