//! Serves stored content for providers without their own CDN.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;

use jotter_core::error::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /objects/{*key}
pub async fn get_object(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Response> {
    let data = state.objects.fetch_bytes(&key).await?;
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, data.len())
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .body(Body::from(data))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;
    Ok(response)
}
