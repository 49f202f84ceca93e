//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::reset::ResetState;

/// A registered account together with its storage counters.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login email, unique case-insensitively.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Quota in bytes.
    pub storage_limit: i64,
    /// Bytes currently charged against the quota.
    pub used_storage: i64,
    /// Outstanding password-reset code.
    #[serde(skip_serializing)]
    pub reset_otp: Option<String>,
    /// When the outstanding reset code stops being accepted.
    #[serde(skip_serializing)]
    pub reset_otp_expires_at: Option<DateTime<Utc>>,
    /// Set once the reset code has been verified.
    #[serde(skip_serializing)]
    pub reset_otp_verified: bool,
    /// Soft-delete marker. Deleted users are invisible to every lookup.
    #[serde(skip_serializing)]
    pub is_deleted: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Bytes still available under the quota.
    pub fn available_storage(&self) -> i64 {
        (self.storage_limit - self.used_storage).max(0)
    }

    /// Whether charging `bytes` more would exceed the quota.
    ///
    /// Reaching the limit exactly is allowed.
    pub fn would_exceed(&self, bytes: i64) -> bool {
        self.used_storage.saturating_add(bytes) > self.storage_limit
    }

    /// Current position in the password-reset flow.
    pub fn reset_state(&self) -> ResetState {
        match (&self.reset_otp, self.reset_otp_verified) {
            (None, _) => ResetState::NoReset,
            (Some(_), true) => ResetState::OtpVerified,
            (Some(_), false) => ResetState::OtpIssued {
                expires_at: self.reset_otp_expires_at,
            },
        }
    }

    /// Public identity subset returned by registration and profile reads.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Display name.
    pub name: String,
    /// Login email, already normalized to lowercase.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Initial quota in bytes.
    pub storage_limit: i64,
}

/// Identity fields safe to return to any caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
}
