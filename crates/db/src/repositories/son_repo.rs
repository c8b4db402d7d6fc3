//! Repository for the `sons` table.

use ghostmonk_core::son::Action;
use ghostmonk_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::son::Son;

/// Column list for sons queries.
const COLUMNS: &str = "id, name, trigger_event, delay, enabled, actions, created_at, updated_at";

/// Provides CRUD and trigger-matching reads for automation rules.
pub struct SonRepo;

impl SonRepo {
    /// Insert a new son, returning the created row.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        trigger_event: &str,
        delay: &str,
        enabled: bool,
        actions: &[Action],
    ) -> Result<Son, sqlx::Error> {
        let query = format!(
            "INSERT INTO sons (name, trigger_event, delay, enabled, actions)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Son>(&query)
            .bind(name)
            .bind(trigger_event)
            .bind(delay)
            .bind(enabled)
            .bind(Json(actions))
            .fetch_one(pool)
            .await
    }

    /// Find a son by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Son>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sons WHERE id = $1");
        sqlx::query_as::<_, Son>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all sons, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Son>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sons ORDER BY created_at ASC, id ASC");
        sqlx::query_as::<_, Son>(&query).fetch_all(pool).await
    }

    /// List enabled sons matching a trigger, in creation order.
    ///
    /// The matcher's ordering contract: stable, deterministic,
    /// tie-broken by id.
    pub async fn list_enabled_by_trigger(
        pool: &PgPool,
        trigger_event: &str,
    ) -> Result<Vec<Son>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sons
             WHERE trigger_event = $1 AND enabled = TRUE
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Son>(&query)
            .bind(trigger_event)
            .fetch_all(pool)
            .await
    }

    /// Replace all mutable fields of a son. Returns the updated row, or
    /// `None` if not found.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        name: &str,
        trigger_event: &str,
        delay: &str,
        enabled: bool,
        actions: &[Action],
    ) -> Result<Option<Son>, sqlx::Error> {
        let query = format!(
            "UPDATE sons SET
                name          = $1,
                trigger_event = $2,
                delay         = $3,
                enabled       = $4,
                actions       = $5,
                updated_at    = NOW()
             WHERE id = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Son>(&query)
            .bind(name)
            .bind(trigger_event)
            .bind(delay)
            .bind(enabled)
            .bind(Json(actions))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a son by its ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sons WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
