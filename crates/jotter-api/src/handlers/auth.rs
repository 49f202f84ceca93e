//! Auth handlers: registration, login, refresh, and password recovery.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use jotter_auth::TokenPair;
use jotter_core::error::AppError;
use jotter_entity::user::PublicUser;
use jotter_service::{LoginOutcome, RegisterInput};

use crate::dto::request::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RefreshRequest,
    RegisterRequest, ResetPasswordRequest, VerifyOtpRequest,
};
use crate::dto::response::{ApiResponse, RefreshResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

const ACCESS_COOKIE: &str = "accessToken";
const REFRESH_COOKIE: &str = "refreshToken";

fn token_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

fn with_token_cookies(jar: CookieJar, tokens: &TokenPair, secure: bool) -> CookieJar {
    jar.add(token_cookie(ACCESS_COOKIE, tokens.access_token.clone(), secure))
        .add(token_cookie(REFRESH_COOKIE, tokens.refresh_token.clone(), secure))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<ApiResponse<PublicUser>> {
    let user = state
        .auth_service
        .register(RegisterInput {
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;
    Ok(ApiResponse::created("User registered Successfully", user))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<(CookieJar, ApiResponse<LoginOutcome>)> {
    let outcome = state.auth_service.login(&req.email, &req.password).await?;
    let jar = with_token_cookies(jar, &outcome.tokens, state.config.server.secure_cookies);
    Ok((jar, ApiResponse::ok("Login successful", outcome)))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshRequest>>,
) -> ApiResult<(CookieJar, ApiResponse<RefreshResponse>)> {
    let token = body
        .and_then(|Json(req)| req.refresh_token)
        .or_else(|| jar.get(REFRESH_COOKIE).map(|c| c.value().to_string()))
        .ok_or_else(|| AppError::authentication("You are not authorized"))?;

    let (access_token, access_expires_at) = state.auth_service.refresh(&token).await?;
    let jar = jar.add(token_cookie(
        ACCESS_COOKIE,
        access_token.clone(),
        state.config.server.secure_cookies,
    ));
    Ok((
        jar,
        ApiResponse::ok(
            "Token refreshed successfully",
            RefreshResponse {
                access_token,
                access_expires_at,
            },
        ),
    ))
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<ApiResponse<()>> {
    state
        .auth_service
        .change_password(&auth.email, &req.current_password, &req.new_password)
        .await?;
    Ok(ApiResponse::message("Password updated successfully"))
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ForgotPasswordRequest>,
) -> ApiResult<ApiResponse<()>> {
    state.auth_service.forgot_password(&req.email).await?;
    Ok(ApiResponse::message("OTP sent to your email"))
}

/// POST /api/auth/verify-otp
pub async fn verify_otp(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<VerifyOtpRequest>,
) -> ApiResult<ApiResponse<()>> {
    state.auth_service.verify_otp(&req.email, &req.otp).await?;
    Ok(ApiResponse::message("OTP verified successfully"))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<ApiResponse<()>> {
    state
        .auth_service
        .reset_password(&req.email, &req.new_password)
        .await?;
    Ok(ApiResponse::message("Password reset successfully"))
}
