//! File and folder handlers.

use axum::extract::{Multipart, Query, State};
use axum::extract::rejection::QueryRejection;
use bytes::Bytes;

use jotter_core::error::AppError;
use jotter_entity::file::{File, FileFilter};
use jotter_entity::storage::StorageInfo;
use jotter_service::UploadInput;

use crate::dto::request::{
    CreateFolderRequest, ListFilesQuery, RenameFileRequest, TogglePrivateRequest,
};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::state::AppState;

fn multipart_error(e: impl std::fmt::Display) -> AppError {
    AppError::validation(format!("Multipart error: {e}"))
}

/// Accepts `true`/`false` as well as `1`/`0`.
fn parse_flag(value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" => Ok(true),
        "false" | "0" | "off" | "" => Ok(false),
        other => Err(AppError::validation(format!("Invalid isPrivate value: {other}"))),
    }
}

/// POST /api/files/upload
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<ApiResponse<File>> {
    let mut file: Option<(String, String, Bytes)> = None;
    let mut is_private = false;
    let mut password: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                let name = field.file_name().unwrap_or_default().to_string();
                let mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                file = Some((name, mime, data));
            }
            "isPrivate" => {
                is_private = parse_flag(&field.text().await.map_err(multipart_error)?)?;
            }
            "password" => {
                password = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let (name, mime_type, bytes) =
        file.ok_or_else(|| AppError::validation("A file is required"))?;
    let uploaded = state
        .file_service
        .upload_file(
            &auth.email,
            UploadInput {
                name,
                mime_type,
                bytes,
                is_private,
                password,
            },
        )
        .await?;
    Ok(ApiResponse::created("File uploaded successfully", uploaded))
}

/// POST /api/files/folder
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> ApiResult<ApiResponse<File>> {
    let folder = state
        .file_service
        .create_folder(&auth.email, &req.name, req.parent_folder)
        .await?;
    Ok(ApiResponse::created("Folder created successfully", folder))
}

/// GET /api/files
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<ListFilesQuery>, QueryRejection>,
) -> ApiResult<ApiResponse<Vec<File>>> {
    let Query(query) = query.map_err(|e| AppError::validation(e.body_text()))?;
    let filter = FileFilter::from(query);
    let files = state.file_service.get_files(&auth.email, &filter).await?;
    Ok(ApiResponse::ok("Files retrieved successfully", files))
}

/// PATCH /api/files/favorite/{id}
pub async fn toggle_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
) -> ApiResult<ApiResponse<File>> {
    let file = state.file_service.toggle_favorite(&auth.email, id).await?;
    Ok(ApiResponse::ok("Favorite status updated", file))
}

/// PATCH /api/files/private/{id}
pub async fn toggle_private(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<TogglePrivateRequest>,
) -> ApiResult<ApiResponse<File>> {
    let file = state
        .file_service
        .toggle_private(&auth.email, id, req.password.as_deref())
        .await?;
    Ok(ApiResponse::ok("Privacy status updated", file))
}

/// PATCH /api/files/rename/{id}
pub async fn rename_file(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<RenameFileRequest>,
) -> ApiResult<ApiResponse<File>> {
    let file = state
        .file_service
        .rename_file(&auth.email, id, &req.new_name)
        .await?;
    Ok(ApiResponse::ok("File renamed successfully", file))
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
) -> ApiResult<ApiResponse<()>> {
    state.file_service.delete_file(&auth.email, id).await?;
    Ok(ApiResponse::message("File deleted successfully"))
}

/// POST /api/files/duplicate/{id}
pub async fn duplicate_file(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
) -> ApiResult<ApiResponse<File>> {
    let copy = state.file_service.duplicate_file(&auth.email, id).await?;
    Ok(ApiResponse::created("File duplicated successfully", copy))
}

/// GET /api/files/storage
pub async fn storage_info(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<StorageInfo>> {
    let info = state.file_service.get_storage_info(&auth.email).await?;
    Ok(ApiResponse::ok("Storage info retrieved", info))
}
