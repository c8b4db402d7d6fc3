//! Son execution log rows, stats aggregates, and the due-queue view.

use ghostmonk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A son execution log row. One per matched rule invocation; the same
/// row is the durable scheduling record (`fire_at`, `claimed_at`) and
/// carries the event payload captured at schedule time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SonExecutionLog {
    pub id: DbId,
    pub son_id: DbId,
    pub webhook_log_id: Option<DbId>,
    pub status: String,
    pub fire_at: Timestamp,
    pub claimed_at: Option<Timestamp>,
    pub payload: Json<serde_json::Value>,
    pub executed_at: Option<Timestamp>,
    pub error_message: String,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Listing row
// ---------------------------------------------------------------------------

/// Listing columns joined with the rule name for display. `son_name` is
/// `None` when the rule has since been deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SonExecutionLogListItem {
    pub id: DbId,
    pub son_id: DbId,
    pub son_name: Option<String>,
    pub webhook_log_id: Option<DbId>,
    pub status: String,
    pub fire_at: Timestamp,
    pub executed_at: Option<Timestamp>,
    pub error_message: String,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Stats aggregate
// ---------------------------------------------------------------------------

/// Per-rule execution counts over a timeframe. `executions` counts only
/// terminal success + failure runs; warnings and pendings are excluded.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SonStats {
    pub name: String,
    pub executions: i64,
    pub success: i64,
    pub failure: i64,
}
