//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Token signing, password policy, and OTP configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for access tokens.
    pub access_secret: String,
    /// HMAC secret for refresh tokens. Must differ from `access_secret`.
    pub refresh_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in hours.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_hours: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Maximum password length.
    #[serde(default = "default_password_max")]
    pub password_max_length: usize,
    /// Lifetime of a password-reset code in minutes.
    #[serde(default = "default_otp_ttl")]
    pub otp_ttl_minutes: i64,
}

fn default_access_ttl() -> u64 {
    60 * 24
}

fn default_refresh_ttl() -> u64 {
    24 * 30
}

fn default_password_min() -> usize {
    6
}

fn default_password_max() -> usize {
    20
}

fn default_otp_ttl() -> i64 {
    15
}
