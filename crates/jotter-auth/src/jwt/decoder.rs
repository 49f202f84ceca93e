//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use jotter_core::config::auth::AuthConfig;
use jotter_core::error::AppError;

use super::claims::{Claims, TokenType};

/// Verifies access and refresh tokens against their own secrets.
#[derive(Clone)]
pub struct JwtDecoder {
    access_key: DecodingKey,
    refresh_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            access_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token.
    pub fn decode_access(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_as(token, &self.access_key, TokenType::Access)
    }

    /// Decodes and validates a refresh token.
    pub fn decode_refresh(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_as(token, &self.refresh_key, TokenType::Refresh)
    }

    fn decode_as(
        &self,
        token: &str,
        key: &DecodingKey,
        expected: TokenType,
    ) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::authentication("Invalid token signature")
                }
                _ => AppError::authentication("You are not authorized"),
            })?
            .claims;

        if claims.token_type != expected {
            return Err(AppError::authentication("Invalid token type"));
        }
        Ok(claims)
    }
}
