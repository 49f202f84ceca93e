//! Health check handler.

use axum::extract::State;
use tracing::warn;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> ApiResponse<HealthResponse> {
    let database = match &state.database {
        Some(db) => Some(match db.ping().await {
            Ok(()) => "connected".to_string(),
            Err(e) => {
                warn!(error = %e, "Health check: database unreachable");
                "unreachable".to_string()
            }
        }),
        None => None,
    };
    let status = match database.as_deref() {
        Some("unreachable") => "degraded",
        _ => "ok",
    };

    ApiResponse::ok(
        "Service is healthy",
        HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database,
            storage: state.objects.provider_type().to_string(),
        },
    )
}
