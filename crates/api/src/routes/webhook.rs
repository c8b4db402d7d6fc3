//! Route definitions for the inbound webhook and its configuration.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::webhook;
use crate::state::AppState;

/// Public inbound route, mounted at root level (not under `/api`).
///
/// ```text
/// POST /webhook/{endpoint} -> receive_webhook
/// ```
pub fn inbound_router() -> Router<AppState> {
    Router::new().route("/webhook/{endpoint}", post(webhook::receive_webhook))
}

/// Configuration routes mounted under `/api`.
///
/// ```text
/// GET  /webhook-info        -> webhook_info
/// POST /webhook-info/rotate -> rotate_webhook_secret
/// ```
pub fn info_router() -> Router<AppState> {
    Router::new()
        .route("/webhook-info", get(webhook::webhook_info))
        .route("/webhook-info/rotate", post(webhook::rotate_webhook_secret))
}
