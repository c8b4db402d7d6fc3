//! Handlers for the webhook delivery log and replay.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use ghostmonk_core::error::CoreError;
use ghostmonk_core::pagination::{
    clamp_limit, clamp_offset, Pagination, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
use ghostmonk_core::types::DbId;
use ghostmonk_db::repositories::WebhookLogRepo;
use ghostmonk_engine::replay::replay;
use serde_json::json;

use crate::error::AppResult;
use crate::query::PaginationParams;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// GET /api/webhook-logs?limit=&offset=
pub async fn list_webhook_logs(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let logs = WebhookLogRepo::list(&state.pool, limit, offset).await?;
    let total = WebhookLogRepo::count(&state.pool).await?;

    Ok(Json(PageResponse {
        data: logs,
        pagination: Pagination::new(total, limit, offset),
    }))
}

/// GET /api/webhook-logs/{id}
///
/// Full stored request: headers, body, and the finalized response.
pub async fn get_webhook_log(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let log = WebhookLogRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "webhook_log",
            id,
        })?;
    Ok(Json(DataResponse { data: log }))
}

/// POST /api/webhook-logs/{id}/replay
///
/// Re-submit the stored delivery as a brand-new one (no signature
/// check). Returns the new delivery's log id and outcome.
pub async fn replay_webhook_log(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = replay(&state.pool, &state.ingest, id).await?;

    Ok(Json(DataResponse {
        data: json!({
            "replayed_from": id,
            "webhook_log_id": outcome.webhook_log_id,
            "status_code": outcome.status_code,
            "sons_matched": outcome.sons_matched,
        }),
    }))
}
