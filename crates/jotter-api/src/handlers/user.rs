//! User profile and account handlers.

use axum::extract::{Query, State};

use jotter_core::types::{PageRequest, PageResponse};
use jotter_entity::user::{PublicUser, User};

use crate::dto::request::UpdateProfileRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> ApiResult<ApiResponse<PageResponse<PublicUser>>> {
    let users = state.user_service.list_users(page).await?;
    Ok(ApiResponse::ok("Users retrieved successfully", users))
}

/// GET /api/users/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<User>> {
    let user = state.user_service.get_profile(auth.id).await?;
    Ok(ApiResponse::ok("User retrieved successfully", user))
}

/// PATCH /api/users/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<ApiResponse<User>> {
    let user = state.user_service.update_profile(auth.id, &req.name).await?;
    Ok(ApiResponse::ok("User updated successfully", user))
}

/// DELETE /api/users/me
pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<()>> {
    state.user_service.delete_account(auth.id).await?;
    Ok(ApiResponse::message("User deleted successfully"))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> ApiResult<ApiResponse<PublicUser>> {
    let user = state.user_service.get_user(id).await?;
    Ok(ApiResponse::ok("User retrieved successfully", user.to_public()))
}
