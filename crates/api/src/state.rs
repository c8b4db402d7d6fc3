use std::sync::Arc;

use ghostmonk_engine::ingest::Ingest;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: ghostmonk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Webhook ingest pipeline, shared by the inbound endpoint and replay.
    pub ingest: Ingest,
}
