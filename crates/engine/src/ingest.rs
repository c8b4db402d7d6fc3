//! Synchronous webhook ingest pipeline.
//!
//! Every authenticated delivery gets exactly one `webhook_logs` row,
//! written before any processing so a crash mid-pipeline still leaves a
//! record. The row is finalized with the pipeline's verdict; matched
//! rules end up as pending `son_execution_logs` rows for the scheduler
//! to pick up.

use std::time::Instant;

use chrono::Utc;
use ghostmonk_core::duration::parse_duration;
use ghostmonk_core::event::detect_trigger;
use ghostmonk_core::signature::{verify_signature, SIGNATURE_HEADER};
use ghostmonk_core::types::DbId;
use ghostmonk_db::repositories::{SonExecutionRepo, SonRepo, WebhookLogRepo, WebhookRepo};
use ghostmonk_db::DbPool;
use serde_json::{json, Value};

/// One inbound delivery, as captured at the HTTP boundary (or loaded
/// back from a stored log row for replay).
#[derive(Debug, Clone)]
pub struct IngestRequest {
    /// Path token identifying the webhook configuration.
    pub endpoint: String,
    pub method: String,
    pub path: String,
    /// Header map as a JSON object, lowercase keys.
    pub headers: Value,
    /// Raw body, kept as text so signatures verify byte-for-byte.
    pub body: String,
    /// Replay passes `false`: the stored delivery was already
    /// authenticated when it first arrived.
    pub verify_signature: bool,
}

/// The pipeline's verdict, mirrored onto the log row and returned to
/// the HTTP handler verbatim.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub status_code: i32,
    pub response: Value,
    /// `None` only when no webhook config matched the endpoint (there
    /// is nothing to attribute a log row to).
    pub webhook_log_id: Option<DbId>,
    pub sons_matched: usize,
}

/// Webhook ingest pipeline over a shared pool.
#[derive(Clone)]
pub struct Ingest {
    pool: DbPool,
}

impl Ingest {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run one delivery through the pipeline.
    ///
    /// Database failures bubble up; everything else (bad signature,
    /// malformed body, unknown event shape) is a finalized log row and
    /// a non-2xx outcome, never an error.
    pub async fn handle(&self, request: IngestRequest) -> Result<IngestOutcome, sqlx::Error> {
        let started = Instant::now();

        let Some(webhook) = WebhookRepo::find_by_endpoint(&self.pool, &request.endpoint).await?
        else {
            tracing::warn!(endpoint = %request.endpoint, "delivery for unknown webhook endpoint");
            return Ok(IngestOutcome {
                status_code: 404,
                response: json!({ "error": "webhook not found" }),
                webhook_log_id: None,
                sons_matched: 0,
            });
        };

        let log = WebhookLogRepo::create(
            &self.pool,
            webhook.id,
            &request.method,
            &request.path,
            &request.headers,
            &request.body,
        )
        .await?;

        if request.verify_signature {
            let header = request
                .headers
                .get(SIGNATURE_HEADER)
                .and_then(Value::as_str)
                .unwrap_or_default();
            if !verify_signature(header, request.body.as_bytes(), &webhook.secret) {
                tracing::warn!(webhook_log_id = log.id, "rejected delivery: invalid signature");
                return self
                    .finish(log.id, started, 401, json!({ "error": "invalid signature" }), 0)
                    .await;
            }
        }

        let payload: Value = match serde_json::from_str(&request.body) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(webhook_log_id = log.id, error = %e, "rejected delivery: bad JSON");
                return self
                    .finish(log.id, started, 400, json!({ "error": "invalid JSON payload" }), 0)
                    .await;
            }
        };

        let Some(trigger) = detect_trigger(&payload) else {
            tracing::warn!(webhook_log_id = log.id, "dropped delivery: unrecognized event shape");
            return self
                .finish(
                    log.id,
                    started,
                    400,
                    json!({ "error": "unable to determine trigger type" }),
                    0,
                )
                .await;
        };

        let sons = SonRepo::list_enabled_by_trigger(&self.pool, trigger.as_str()).await?;
        for son in &sons {
            // A bad stored token falls back to immediate execution
            // rather than wedging the delivery.
            let delay = parse_duration(&son.delay).unwrap_or_else(|_| {
                tracing::warn!(son_id = son.id, delay = %son.delay, "unparseable delay, firing now");
                std::time::Duration::ZERO
            });
            let fire_at = Utc::now()
                + chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero());

            let execution =
                SonExecutionRepo::schedule(&self.pool, son.id, Some(log.id), fire_at, &payload)
                    .await?;
            tracing::info!(
                son_id = son.id,
                execution_id = execution.id,
                trigger = %trigger,
                fire_at = %fire_at,
                "scheduled son execution",
            );
        }

        self.finish(
            log.id,
            started,
            200,
            json!({ "message": "webhook processed", "sons_matched": sons.len() }),
            sons.len(),
        )
        .await
    }

    async fn finish(
        &self,
        log_id: DbId,
        started: Instant,
        status_code: i32,
        response: Value,
        sons_matched: usize,
    ) -> Result<IngestOutcome, sqlx::Error> {
        let duration_ms = started.elapsed().as_millis() as i64;
        WebhookLogRepo::finalize(&self.pool, log_id, status_code, &response, duration_ms).await?;
        Ok(IngestOutcome {
            status_code,
            response,
            webhook_log_id: Some(log_id),
            sons_matched,
        })
    }
}
