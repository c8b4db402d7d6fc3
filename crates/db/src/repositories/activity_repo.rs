//! Repository for the `recent_activity` table.

use sqlx::PgPool;

use crate::models::activity::RecentActivity;

const COLUMNS: &str = "id, action_type, description, created_at";

pub struct ActivityRepo;

impl ActivityRepo {
    /// Append a rule lifecycle event to the dashboard feed.
    pub async fn log(
        pool: &PgPool,
        action_type: &str,
        description: &str,
    ) -> Result<RecentActivity, sqlx::Error> {
        let query = format!(
            "INSERT INTO recent_activity (action_type, description)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RecentActivity>(&query)
            .bind(action_type)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    /// Most recent feed entries, newest first.
    pub async fn list(pool: &PgPool, limit: i64) -> Result<Vec<RecentActivity>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM recent_activity
             ORDER BY created_at DESC, id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, RecentActivity>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
