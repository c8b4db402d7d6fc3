//! Repository for the `son_execution_logs` table.
//!
//! An execution row is both the audit record and the durable delay-queue
//! entry. Ingest inserts it as `pending` with a `fire_at`; the scheduler
//! claims due rows one at a time with `FOR UPDATE SKIP LOCKED` so
//! concurrent schedulers never double-dispatch; the executor finalizes
//! the terminal status.

use ghostmonk_core::types::{DbId, Timestamp};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::son_execution_log::{SonExecutionLog, SonExecutionLogListItem, SonStats};

const COLUMNS: &str = "id, son_id, webhook_log_id, status, fire_at, claimed_at, payload, \
                       executed_at, error_message, created_at";

pub struct SonExecutionRepo;

impl SonExecutionRepo {
    /// Enqueue a pending execution for a matched rule. The payload is the
    /// event body captured at ingest time; the row becomes visible to the
    /// scheduler once `fire_at` passes.
    pub async fn schedule(
        pool: &PgPool,
        son_id: DbId,
        webhook_log_id: Option<DbId>,
        fire_at: Timestamp,
        payload: &Value,
    ) -> Result<SonExecutionLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO son_execution_logs (son_id, webhook_log_id, fire_at, payload)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SonExecutionLog>(&query)
            .bind(son_id)
            .bind(webhook_log_id)
            .bind(fire_at)
            .bind(Json(payload))
            .fetch_one(pool)
            .await
    }

    /// Claim the oldest due pending execution, or `None` if the queue is
    /// empty. `SKIP LOCKED` lets concurrent claimers pass over rows
    /// another transaction is already taking.
    pub async fn claim_next_due(pool: &PgPool) -> Result<Option<SonExecutionLog>, sqlx::Error> {
        let query = format!(
            "UPDATE son_execution_logs SET claimed_at = NOW()
             WHERE id = (
                 SELECT id FROM son_execution_logs
                 WHERE status = 'pending' AND claimed_at IS NULL AND fire_at <= NOW()
                 ORDER BY fire_at ASC, id ASC
                 LIMIT 1
                 FOR UPDATE SKIP LOCKED
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SonExecutionLog>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Record the terminal outcome of a claimed execution.
    pub async fn finalize(
        pool: &PgPool,
        id: DbId,
        status: &str,
        error_message: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE son_execution_logs
             SET status = $1, error_message = $2, executed_at = NOW()
             WHERE id = $3",
        )
        .bind(status)
        .bind(error_message)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SonExecutionLog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM son_execution_logs WHERE id = $1");
        sqlx::query_as::<_, SonExecutionLog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Page through executions newest first, joined with the rule name.
    /// The join is LEFT so entries survive rule deletion (son_name comes
    /// back NULL).
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SonExecutionLogListItem>, sqlx::Error> {
        sqlx::query_as::<_, SonExecutionLogListItem>(
            "SELECT sel.id, sel.son_id, s.name AS son_name, sel.webhook_log_id, sel.status,
                    sel.fire_at, sel.executed_at, sel.error_message, sel.created_at
             FROM son_execution_logs sel
             LEFT JOIN sons s ON s.id = sel.son_id
             ORDER BY sel.created_at DESC, sel.id DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM son_execution_logs")
            .fetch_one(pool)
            .await
    }

    /// Per-rule counts of executions finished since `since`. Only rules
    /// with at least one terminal run in the window appear; `executions`
    /// counts success + failure, warnings are broken out by neither.
    pub async fn stats_since(pool: &PgPool, since: Timestamp) -> Result<Vec<SonStats>, sqlx::Error> {
        sqlx::query_as::<_, SonStats>(
            "SELECT s.name,
                    COUNT(*) FILTER (WHERE sel.status IN ('success', 'failure')) AS executions,
                    COUNT(*) FILTER (WHERE sel.status = 'success') AS success,
                    COUNT(*) FILTER (WHERE sel.status = 'failure') AS failure
             FROM sons s
             JOIN son_execution_logs sel ON sel.son_id = s.id
             WHERE sel.executed_at >= $1
             GROUP BY s.id, s.name
             HAVING COUNT(*) FILTER (WHERE sel.status IN ('success', 'failure')) > 0
             ORDER BY s.name ASC",
        )
        .bind(since)
        .fetch_all(pool)
        .await
    }
}
