//! Health handler

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::communication::mailer::Mailer,
    infrastructure::http::{
        auth,
        errors::{ApiError, ErrorResponse},
        state::AppState,
    },
};

/// The health response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Liveness indicator
    #[schema(example = "healthy")]
    pub status: String,

    /// Seconds since the process started
    #[schema(example = 123)]
    pub uptime: i64,
}

/// Report process liveness
#[utoipa::path(
    get,
    operation_id = "health",
    tag = "System",
    path = "/health",
    responses(
        (status = StatusCode::OK, description = "Health response", body = HealthResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Missing or invalid API key", body = ErrorResponse),
    )
)]
pub async fn handler<M: Mailer>(
    State(state): State<AppState<M>>,
    headers: HeaderMap,
) -> Result<Json<HealthResponse>, ApiError> {
    auth::require_api_key(&state.config, &headers)?;

    let uptime = Utc::now().timestamp() - state.start_time.timestamp();

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        uptime,
    }))
}
