//! JWT token creation with separate access and refresh secrets.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jotter_core::config::auth::AuthConfig;
use jotter_core::error::AppError;

use super::claims::{Claims, TokenType};

/// Signs access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    access_key: EncodingKey,
    refresh_key: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// Tokens issued on login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_ttl_minutes as i64),
            refresh_ttl: Duration::hours(config.refresh_ttl_hours as i64),
        }
    }

    fn sign(
        &self,
        user_id: Uuid,
        email: &str,
        token_type: TokenType,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let (key, ttl) = match token_type {
            TokenType::Access => (&self.access_key, self.access_ttl),
            TokenType::Refresh => (&self.refresh_key, self.refresh_ttl),
        };
        let exp = now + ttl;
        let claims = Claims {
            email: email.to_string(),
            user_id,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
            token_type,
        };
        let token = encode(&Header::default(), &claims, key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))?;
        Ok((token, exp))
    }

    /// Issues an access + refresh token pair.
    pub fn issue_pair(&self, user_id: Uuid, email: &str) -> Result<TokenPair, AppError> {
        let (access_token, access_expires_at) = self.sign(user_id, email, TokenType::Access)?;
        let (refresh_token, refresh_expires_at) = self.sign(user_id, email, TokenType::Refresh)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
        })
    }

    /// Issues a standalone access token (after refresh).
    pub fn issue_access(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        self.sign(user_id, email, TokenType::Access)
    }
}
