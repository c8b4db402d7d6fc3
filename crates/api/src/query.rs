//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped via `clamp_limit` / `clamp_offset` before hitting
/// the repository layer.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?limit=` for the activity feed.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

/// `?timeframe=` for the stats endpoint.
#[derive(Debug, Deserialize)]
pub struct TimeframeParams {
    pub timeframe: Option<String>,
}

/// `?reveal=true` to return the webhook secret unmasked.
#[derive(Debug, Deserialize)]
pub struct RevealParams {
    #[serde(default)]
    pub reveal: bool,
}
