//! In-memory user store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use jotter_core::error::AppError;
use jotter_core::result::AppResult;
use jotter_core::types::{PageRequest, PageResponse};
use jotter_entity::user::{CreateUser, User};

use crate::store::UserStore;

/// [`UserStore`] backed by concurrent hash maps.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: DashMap<Uuid, User>,
    /// Lowercased email to id. Soft-deleted users keep their entry.
    emails: DashMap<String, Uuid>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `f` to a live user, returning whether one matched.
    fn modify(&self, id: Uuid, apply: impl FnOnce(&mut User)) -> bool {
        match self.users.get_mut(&id) {
            Some(mut user) if !user.is_deleted => {
                apply(&mut *user);
                user.updated_at = Utc::now();
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(id) = self.emails.get(&email.to_lowercase()).map(|e| *e.value()) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self
            .users
            .get(&id)
            .filter(|u| !u.is_deleted)
            .map(|u| u.value().clone()))
    }

    async fn list(&self, page: PageRequest) -> AppResult<PageResponse<User>> {
        let mut live: Vec<User> = self
            .users
            .iter()
            .filter(|u| !u.is_deleted)
            .map(|u| u.value().clone())
            .collect();
        live.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = live.len() as u64;
        let items = live
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page, total))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        match self.emails.entry(data.email.to_lowercase()) {
            Entry::Occupied(_) => Err(AppError::conflict("User already exists")),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let user = User {
                    id: Uuid::new_v4(),
                    name: data.name.clone(),
                    email: data.email.clone(),
                    password_hash: data.password_hash.clone(),
                    storage_limit: data.storage_limit,
                    used_storage: 0,
                    reset_otp: None,
                    reset_otp_expires_at: None,
                    reset_otp_verified: false,
                    is_deleted: false,
                    created_at: now,
                    updated_at: now,
                };
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(user)
            }
        }
    }

    async fn update_name(&self, id: Uuid, name: &str) -> AppResult<Option<User>> {
        self.modify(id, |u| u.name = name.to_string());
        self.find_by_id(id).await
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        self.modify(id, |u| u.password_hash = password_hash.to_string());
        Ok(())
    }

    async fn set_reset_otp(
        &self,
        id: Uuid,
        otp: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.modify(id, |u| {
            u.reset_otp = Some(otp.to_string());
            u.reset_otp_expires_at = Some(expires_at);
            u.reset_otp_verified = false;
        });
        Ok(())
    }

    async fn mark_otp_verified(&self, id: Uuid) -> AppResult<()> {
        self.modify(id, |u| u.reset_otp_verified = true);
        Ok(())
    }

    async fn reset_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        self.modify(id, |u| {
            u.password_hash = password_hash.to_string();
            u.reset_otp = None;
            u.reset_otp_expires_at = None;
            u.reset_otp_verified = false;
        });
        Ok(())
    }

    async fn try_reserve_storage(&self, id: Uuid, bytes: i64) -> AppResult<Option<User>> {
        let Some(mut user) = self.users.get_mut(&id) else {
            return Ok(None);
        };
        if user.is_deleted || user.would_exceed(bytes) {
            return Ok(None);
        }
        user.used_storage += bytes;
        user.updated_at = Utc::now();
        Ok(Some(user.value().clone()))
    }

    async fn release_storage(&self, id: Uuid, bytes: i64) -> AppResult<()> {
        self.modify(id, |u| u.used_storage = (u.used_storage - bytes).max(0));
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.modify(id, |u| u.is_deleted = true))
    }
}
