//! Handler for the dashboard activity feed.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use ghostmonk_core::pagination::{clamp_limit, MAX_PAGE_LIMIT};
use ghostmonk_db::repositories::ActivityRepo;

use crate::error::AppResult;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Feed entries returned when no limit is given.
const DEFAULT_FEED_LIMIT: i64 = 20;

/// GET /api/recent-activity?limit=
pub async fn recent_activity(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_FEED_LIMIT, MAX_PAGE_LIMIT);
    let feed = ActivityRepo::list(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: feed }))
}
