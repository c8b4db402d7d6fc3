pub mod health;
pub mod sons;
pub mod webhook;
pub mod webhook_logs;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /sons                              list, create
/// /sons/{id}                         get, update, delete
///
/// /webhook-logs                      paginated listing
/// /webhook-logs/{id}                 stored request detail
/// /webhook-logs/{id}/replay          re-submit delivery (POST)
///
/// /son-execution-logs                paginated listing
/// /son-executions/{id}/action-logs   per-action trail
/// /son-stats                         per-rule counts (?timeframe=)
///
/// /webhook-info                      endpoint URL + masked secret
/// /webhook-info/rotate               rotate secret (POST)
///
/// /recent-activity                   rule lifecycle feed
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/sons", sons::router())
        .merge(webhook_logs::router())
        .route(
            "/son-execution-logs",
            get(handlers::son_executions::list_son_execution_logs),
        )
        .route(
            "/son-executions/{id}/action-logs",
            get(handlers::son_executions::list_action_logs),
        )
        .route("/son-stats", get(handlers::stats::son_stats))
        .merge(webhook::info_router())
        .route("/recent-activity", get(handlers::activity::recent_activity))
}
