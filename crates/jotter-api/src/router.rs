//! Route definitions for the Jotter HTTP API.
//!
//! Routes are grouped by domain and mounted under `/api`; stored content is
//! served under `/objects`.

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware as axum_middleware;
use axum::routing::{get, patch, post};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Room left for multipart framing above the largest accepted upload.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit =
        state.config.storage.max_upload_size_bytes as usize + MULTIPART_OVERHEAD_BYTES;
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(file_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .route("/objects/{*key}", get(handlers::object::get_object))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors::build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Registration, login, token refresh, and password recovery
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/change-password", post(handlers::auth::change_password))
        .route("/auth/forgot-password", post(handlers::auth::forgot_password))
        .route("/auth/verify-otp", post(handlers::auth::verify_otp))
        .route("/auth/reset-password", post(handlers::auth::reset_password))
}

/// Profile and account endpoints
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::user::list_users))
        .route(
            "/users/me",
            get(handlers::user::get_profile)
                .patch(handlers::user::update_profile)
                .delete(handlers::user::delete_account),
        )
        .route("/users/{id}", get(handlers::user::get_user))
}

/// File lifecycle
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(handlers::file::list_files))
        .route("/files/upload", post(handlers::file::upload_file))
        .route("/files/folder", post(handlers::file::create_folder))
        .route("/files/storage", get(handlers::file::storage_info))
        .route("/files/favorite/{id}", patch(handlers::file::toggle_favorite))
        .route("/files/private/{id}", patch(handlers::file::toggle_private))
        .route("/files/rename/{id}", patch(handlers::file::rename_file))
        .route("/files/duplicate/{id}", post(handlers::file::duplicate_file))
        .route("/files/{id}", axum::routing::delete(handlers::file::delete_file))
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
