//! Route definitions for the delivery log, execution logs, and replay.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::webhook_logs;
use crate::state::AppState;

/// ```text
/// GET  /webhook-logs              -> list_webhook_logs
/// GET  /webhook-logs/{id}         -> get_webhook_log
/// POST /webhook-logs/{id}/replay  -> replay_webhook_log
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/webhook-logs", get(webhook_logs::list_webhook_logs))
        .route("/webhook-logs/{id}", get(webhook_logs::get_webhook_log))
        .route(
            "/webhook-logs/{id}/replay",
            post(webhook_logs::replay_webhook_log),
        )
}
