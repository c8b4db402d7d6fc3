//! Webhook delivery log rows.

use ghostmonk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Full row
// ---------------------------------------------------------------------------

/// A full webhook log row, served by the detail endpoint and loaded for
/// replay.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WebhookLog {
    pub id: DbId,
    pub webhook_id: DbId,
    pub received_at: Timestamp,
    pub method: String,
    pub path: String,
    pub headers: Json<serde_json::Value>,
    pub body: String,
    pub status_code: i32,
    pub response_body: Option<Json<serde_json::Value>>,
    pub duration_ms: i64,
}

// ---------------------------------------------------------------------------
// Listing row
// ---------------------------------------------------------------------------

/// Summary columns for the paginated listing (headers and bodies are
/// only served on the detail endpoint).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WebhookLogSummary {
    pub id: DbId,
    pub received_at: Timestamp,
    pub method: String,
    pub path: String,
    pub status_code: i32,
    pub duration_ms: i64,
}
