//! Handlers for son execution logs and their action trails.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use ghostmonk_core::error::CoreError;
use ghostmonk_core::pagination::{
    clamp_limit, clamp_offset, Pagination, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
use ghostmonk_core::types::DbId;
use ghostmonk_db::repositories::{ActionLogRepo, SonExecutionRepo};

use crate::error::AppResult;
use crate::query::PaginationParams;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// GET /api/son-execution-logs?limit=&offset=
///
/// Newest first, joined with the rule name (`son_name` is null for
/// since-deleted rules).
pub async fn list_son_execution_logs(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let logs = SonExecutionRepo::list(&state.pool, limit, offset).await?;
    let total = SonExecutionRepo::count(&state.pool).await?;

    Ok(Json(PageResponse {
        data: logs,
        pagination: Pagination::new(total, limit, offset),
    }))
}

/// GET /api/son-executions/{id}/action-logs
///
/// The per-action trail of one execution, in the order the actions ran.
pub async fn list_action_logs(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    SonExecutionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "son_execution_log",
            id,
        })?;

    let logs = ActionLogRepo::list_for_execution(&state.pool, id).await?;
    Ok(Json(DataResponse { data: logs }))
}
