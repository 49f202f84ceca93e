//! `AuthUser` extractor: resolves the caller from the access token.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use jotter_core::error::AppError;
use jotter_entity::user::User;

use crate::error::ApiError;
use crate::state::AppState;

/// The live user behind the request's access token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl std::ops::Deref for AuthUser {
    type Target = User;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Token from an `Authorization` value, with or without the `Bearer` scheme.
fn token_from_header(value: &str) -> Option<&str> {
    let value = value.trim_start();
    let token = match value.split_at_checked(6) {
        Some((scheme, rest))
            if scheme.eq_ignore_ascii_case("bearer")
                && (rest.is_empty() || rest.starts_with(char::is_whitespace)) =>
        {
            rest
        }
        _ => value,
    };
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(token_from_header)
            .ok_or_else(|| AppError::authentication("You are not authorized"))?;

        let user = state.auth_service.authenticate(token).await?;
        Ok(AuthUser(user))
    }
}
