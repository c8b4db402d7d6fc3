//! Action execution log rows.

use ghostmonk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One attempted action within a son execution, in pipeline order.
/// Append-only; removed only by cascade from the parent execution.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActionExecutionLog {
    pub id: DbId,
    pub son_execution_log_id: DbId,
    pub action_type: String,
    pub status: String,
    pub executed_at: Timestamp,
    pub error_message: String,
}
