//! User repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use jotter_core::error::{AppError, ErrorKind};
use jotter_core::result::AppResult;
use jotter_core::types::{PageRequest, PageResponse};
use jotter_entity::user::{CreateUser, User};

use crate::store::UserStore;

/// PostgreSQL-backed [`UserStore`].
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn execute(&self, sql: &str, id: Uuid, what: &str) -> AppResult<()> {
        sqlx::query(sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AppError::with_source(ErrorKind::Database, format!("Failed to {what}"), e))
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(email) = LOWER($1) AND is_deleted = FALSE",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by email", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND is_deleted = FALSE")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn list(&self, page: PageRequest) -> AppResult<PageResponse<User>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_deleted = FALSE")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count users", e))?;

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE is_deleted = FALSE \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))?;

        Ok(PageResponse::new(users, page, total as u64))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash, storage_limit) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.storage_limit)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
                AppError::conflict("User already exists")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })
    }

    async fn update_name(&self, id: Uuid, name: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET name = $2, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update user", e))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update password", e))
    }

    async fn set_reset_otp(
        &self,
        id: Uuid,
        otp: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET reset_otp = $2, reset_otp_expires_at = $3, \
             reset_otp_verified = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(otp)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store reset code", e))
    }

    async fn mark_otp_verified(&self, id: Uuid) -> AppResult<()> {
        self.execute(
            "UPDATE users SET reset_otp_verified = TRUE, updated_at = NOW() WHERE id = $1",
            id,
            "mark reset code verified",
        )
        .await
    }

    async fn reset_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET password_hash = $2, reset_otp = NULL, \
             reset_otp_expires_at = NULL, reset_otp_verified = FALSE, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to reset password", e))
    }

    async fn try_reserve_storage(&self, id: Uuid, bytes: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET used_storage = used_storage + $2, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE AND used_storage + $2 <= storage_limit \
             RETURNING *",
        )
        .bind(id)
        .bind(bytes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to reserve storage", e))
    }

    async fn release_storage(&self, id: Uuid, bytes: i64) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET used_storage = GREATEST(used_storage - $2, 0), \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(bytes)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to release storage", e))
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete user", e))?;
        Ok(result.rows_affected() > 0)
    }
}
