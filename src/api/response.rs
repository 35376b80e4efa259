use crate::utils::error::{RelayError, NOT_FOUND_MESSAGE, SEND_FAILED_MESSAGE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Body of every JSON response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn success() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            ok: false,
            error: Some(message.to_string()),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ApiResponse::failure(self.public_message())),
        )
            .into_response()
    }
}

pub fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::failure(NOT_FOUND_MESSAGE)),
    )
        .into_response()
}

/// Used by the panic catcher so a crashing request still gets the generic failure body.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("Request handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::failure(SEND_FAILED_MESSAGE)),
    )
        .into_response()
}
