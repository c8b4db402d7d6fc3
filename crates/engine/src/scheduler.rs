//! Delay scheduler: polls for due executions and dispatches them.
//!
//! Claims due rows one at a time via `FOR UPDATE SKIP LOCKED` (see
//! [`SonExecutionRepo::claim_next_due`]) so multiple scheduler
//! instances never double-dispatch, and spawns the executor on bounded
//! worker tasks. A crash between claim and terminal status leaves a
//! visible pending row for the operator to replay; there is no
//! automatic retry.

use std::sync::Arc;
use std::time::Duration;

use ghostmonk_db::repositories::SonExecutionRepo;
use ghostmonk_db::DbPool;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::executor::Executor;

/// Default polling interval for the scheduler loop.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default cap on concurrently executing invocations.
const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Background scheduler.
///
/// A single long-lived Tokio task that moves due pending executions
/// onto executor tasks.
pub struct Scheduler {
    pool: DbPool,
    executor: Arc<Executor>,
    poll_interval: Duration,
    permits: Arc<Semaphore>,
}

impl Scheduler {
    /// Create a scheduler with the default poll interval and
    /// concurrency cap.
    pub fn new(pool: DbPool, executor: Arc<Executor>) -> Self {
        Self::with_settings(pool, executor, DEFAULT_POLL_INTERVAL, DEFAULT_MAX_CONCURRENCY)
    }

    pub fn with_settings(
        pool: DbPool,
        executor: Arc<Executor>,
        poll_interval: Duration,
        max_concurrency: usize,
    ) -> Self {
        Self {
            pool,
            executor,
            poll_interval,
            permits: Arc::new(Semaphore::new(max_concurrency)),
        }
    }

    /// Run the scheduler loop until the cancellation token is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        tracing::info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            max_concurrency = self.permits.available_permits(),
            "Scheduler started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Scheduler shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.drain_due().await {
                        tracing::error!(error = %e, "Scheduler cycle failed");
                    }
                }
            }
        }
    }

    /// One cycle: claim every currently-due row and spawn its executor
    /// task, bounded by the semaphore. Waiting on a permit while rows
    /// are already claimed is fine; the claim marks them as ours.
    async fn drain_due(&self) -> Result<(), sqlx::Error> {
        loop {
            let Some(execution) = SonExecutionRepo::claim_next_due(&self.pool).await? else {
                return Ok(());
            };
            tracing::info!(
                execution_id = execution.id,
                son_id = execution.son_id,
                "execution claimed",
            );

            let permit = match Arc::clone(&self.permits).acquire_owned().await {
                Ok(permit) => permit,
                // Closed semaphore means shutdown is in progress.
                Err(_) => return Ok(()),
            };
            let executor = Arc::clone(&self.executor);
            tokio::spawn(async move {
                if let Err(e) = executor.execute(&execution).await {
                    tracing::error!(
                        execution_id = execution.id,
                        error = %e,
                        "Executor failed with database error",
                    );
                }
                drop(permit);
            });
        }
    }
}
