//! Recent activity feed rows.

use ghostmonk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A rule lifecycle event shown on the dashboard feed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecentActivity {
    pub id: DbId,
    pub action_type: String,
    pub description: String,
    pub created_at: Timestamp,
}
