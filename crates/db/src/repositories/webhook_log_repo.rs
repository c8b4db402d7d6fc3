//! Repository for the `webhook_logs` table.
//!
//! Ingest writes log-first: a row is created before any processing so a
//! crash mid-pipeline still leaves a record, then finalized with the
//! outcome once the pass completes. Until finalization the row carries
//! status_code 0, so orphaned rows never read as successful deliveries.

use ghostmonk_core::types::DbId;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::webhook_log::{WebhookLog, WebhookLogSummary};

const COLUMNS: &str =
    "id, webhook_id, received_at, method, path, headers, body, status_code, response_body, \
     duration_ms";

const SUMMARY_COLUMNS: &str = "id, received_at, method, path, status_code, duration_ms";

pub struct WebhookLogRepo;

impl WebhookLogRepo {
    /// Record an inbound delivery before processing begins.
    pub async fn create(
        pool: &PgPool,
        webhook_id: DbId,
        method: &str,
        path: &str,
        headers: &Value,
        body: &str,
    ) -> Result<WebhookLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO webhook_logs (webhook_id, method, path, headers, body)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WebhookLog>(&query)
            .bind(webhook_id)
            .bind(method)
            .bind(path)
            .bind(Json(headers))
            .bind(body)
            .fetch_one(pool)
            .await
    }

    /// Stamp the outcome of a finished ingest pass onto its log row.
    pub async fn finalize(
        pool: &PgPool,
        id: DbId,
        status_code: i32,
        response_body: &Value,
        duration_ms: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE webhook_logs SET status_code = $1, response_body = $2, duration_ms = $3
             WHERE id = $4",
        )
        .bind(status_code)
        .bind(Json(response_body))
        .bind(duration_ms)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load a full log row, bodies and headers included.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WebhookLog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM webhook_logs WHERE id = $1");
        sqlx::query_as::<_, WebhookLog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Page through delivery summaries, newest first.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WebhookLogSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM webhook_logs
             ORDER BY received_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, WebhookLogSummary>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM webhook_logs")
            .fetch_one(pool)
            .await
    }
}
