//! Handler for per-rule execution statistics.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use ghostmonk_core::duration::parse_timeframe;
use ghostmonk_core::error::CoreError;
use ghostmonk_db::repositories::SonExecutionRepo;

use crate::error::AppResult;
use crate::query::TimeframeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Timeframe used when the query string does not name one.
const DEFAULT_TIMEFRAME: &str = "24h";

/// GET /api/son-stats?timeframe=
///
/// Per-rule counts of terminal executions inside the window. Warnings
/// and pendings are excluded; rules without a terminal run are omitted.
pub async fn son_stats(
    State(state): State<AppState>,
    Query(params): Query<TimeframeParams>,
) -> AppResult<impl IntoResponse> {
    let timeframe = params.timeframe.as_deref().unwrap_or(DEFAULT_TIMEFRAME);
    let window = parse_timeframe(timeframe)
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    let since = chrono::Utc::now()
        - chrono::Duration::from_std(window).unwrap_or_else(|_| chrono::Duration::hours(24));
    let stats = SonExecutionRepo::stats_since(&state.pool, since).await?;

    Ok(Json(DataResponse { data: stats }))
}
