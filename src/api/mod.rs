mod handlers;
mod response;

pub use response::ApiResponse;

use crate::config::RelayConfig;
use crate::core::dispatch::TelegramNotifier;
use crate::core::relay::LeadRelay;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub relay: LeadRelay,
    pub max_body_bytes: usize,
}

/// Router wired to the Telegram notifier described by `config`.
pub fn create_api_server(config: &RelayConfig) -> Router {
    let notifier = TelegramNotifier::new(config);
    let state = AppState {
        relay: LeadRelay::new(Arc::new(notifier)),
        max_body_bytes: config.max_body_bytes,
    };
    router(state)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/health",
            get(handlers::health).fallback(handlers::unmatched),
        )
        .route(
            "/api/lead",
            post(handlers::submit_lead).fallback(handlers::unmatched),
        )
        .fallback(handlers::unmatched)
        .with_state(state)
        .layer(CatchPanicLayer::custom(response::panic_response))
        // CORS headers go on every response, preflight or not
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(TraceLayer::new_for_http())
}
