//! Webhook configuration row.

use ghostmonk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A webhook configuration row from the `webhooks` table.
///
/// One row per deployment; `endpoint` is the path token inbound
/// deliveries post to, `secret` signs them.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Webhook {
    pub id: DbId,
    pub endpoint: String,
    pub secret: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
