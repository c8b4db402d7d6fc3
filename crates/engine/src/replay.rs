//! Replay: re-feed a stored delivery through ingest.
//!
//! Replay is the system's retry mechanism. The stored request is
//! submitted as a brand-new delivery with signature verification
//! disabled (it was authenticated when it first arrived); the original
//! log row is never mutated.

use ghostmonk_core::types::DbId;
use ghostmonk_db::repositories::{WebhookLogRepo, WebhookRepo};
use ghostmonk_db::DbPool;

use crate::ingest::{Ingest, IngestOutcome, IngestRequest};
use crate::EngineError;

/// Re-submit the delivery stored under `webhook_log_id`.
///
/// Produces a fresh webhook_log row and, on a match, a fresh scheduling
/// chain. Errors with NotFound when the id is unknown.
pub async fn replay(
    pool: &DbPool,
    ingest: &Ingest,
    webhook_log_id: DbId,
) -> Result<IngestOutcome, EngineError> {
    let log = WebhookLogRepo::find_by_id(pool, webhook_log_id)
        .await?
        .ok_or(EngineError::NotFound {
            entity: "webhook_log",
            id: webhook_log_id,
        })?;

    let webhook = WebhookRepo::find_by_id(pool, log.webhook_id)
        .await?
        .ok_or(EngineError::NotFound {
            entity: "webhook",
            id: log.webhook_id,
        })?;

    tracing::info!(webhook_log_id, "replaying stored delivery");
    let outcome = ingest
        .handle(IngestRequest {
            endpoint: webhook.endpoint,
            method: log.method,
            path: log.path,
            headers: log.headers.0,
            body: log.body,
            verify_signature: false,
        })
        .await?;
    Ok(outcome)
}
