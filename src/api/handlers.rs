use super::response::{not_found, ApiResponse};
use super::AppState;
use crate::utils::error::RelayError;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

pub async fn health() -> Json<ApiResponse> {
    Json(ApiResponse::success())
}

pub async fn submit_lead(
    State(state): State<AppState>,
    body: Body,
) -> Result<Json<ApiResponse>, RelayError> {
    // Checked before the body is read
    if !state.relay.is_configured() {
        tracing::error!("Rejecting lead: Telegram token or chat ids are missing");
        return Err(RelayError::ConfigMissing);
    }

    match read_and_submit(&state, body).await {
        Ok(()) => Ok(Json(ApiResponse::success())),
        Err(e) => {
            match &e {
                RelayError::InvalidPayload => tracing::info!("Rejecting lead: {}", e),
                _ => tracing::error!("Failed to relay lead: {}", e),
            }
            Err(e)
        }
    }
}

async fn read_and_submit(state: &AppState, body: Body) -> Result<(), RelayError> {
    let raw = axum::body::to_bytes(body, state.max_body_bytes).await?;
    tracing::debug!("Received lead body ({} bytes)", raw.len());
    state.relay.submit(&raw).await
}

/// Preflight for any path, 404 for everything else.
pub async fn unmatched(method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }
    not_found()
}
