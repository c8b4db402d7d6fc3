//! Repository for the `action_execution_logs` table.

use ghostmonk_core::types::DbId;
use sqlx::PgPool;

use crate::models::action_execution_log::ActionExecutionLog;

const COLUMNS: &str = "id, son_execution_log_id, action_type, status, executed_at, error_message";

pub struct ActionLogRepo;

impl ActionLogRepo {
    /// Append one action outcome to an execution's trail.
    pub async fn create(
        pool: &PgPool,
        son_execution_log_id: DbId,
        action_type: &str,
        status: &str,
        error_message: &str,
    ) -> Result<ActionExecutionLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO action_execution_logs
                 (son_execution_log_id, action_type, status, error_message)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActionExecutionLog>(&query)
            .bind(son_execution_log_id)
            .bind(action_type)
            .bind(status)
            .bind(error_message)
            .fetch_one(pool)
            .await
    }

    /// All action outcomes for one execution, in the order they ran.
    pub async fn list_for_execution(
        pool: &PgPool,
        son_execution_log_id: DbId,
    ) -> Result<Vec<ActionExecutionLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM action_execution_logs
             WHERE son_execution_log_id = $1
             ORDER BY executed_at ASC, id ASC"
        );
        sqlx::query_as::<_, ActionExecutionLog>(&query)
            .bind(son_execution_log_id)
            .fetch_all(pool)
            .await
    }
}
