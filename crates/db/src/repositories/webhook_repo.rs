//! Repository for the `webhooks` table.

use ghostmonk_core::types::DbId;
use sqlx::PgPool;

use crate::models::webhook::Webhook;

const COLUMNS: &str = "id, endpoint, secret, created_at, updated_at";

/// Manages the singleton inbound webhook configuration.
pub struct WebhookRepo;

impl WebhookRepo {
    /// Return the deployment's webhook row, creating it with the given
    /// endpoint and secret if none exists yet. Called once at startup.
    pub async fn ensure(
        pool: &PgPool,
        endpoint: &str,
        secret: &str,
    ) -> Result<Webhook, sqlx::Error> {
        if let Some(existing) = Self::get(pool).await? {
            return Ok(existing);
        }
        let query = format!(
            "INSERT INTO webhooks (endpoint, secret)
             VALUES ($1, $2)
             ON CONFLICT (endpoint) DO UPDATE SET updated_at = webhooks.updated_at
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Webhook>(&query)
            .bind(endpoint)
            .bind(secret)
            .fetch_one(pool)
            .await
    }

    /// Return the webhook row, if one exists.
    pub async fn get(pool: &PgPool) -> Result<Option<Webhook>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM webhooks ORDER BY id ASC LIMIT 1");
        sqlx::query_as::<_, Webhook>(&query)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Webhook>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM webhooks WHERE id = $1");
        sqlx::query_as::<_, Webhook>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up a webhook by its endpoint path token.
    pub async fn find_by_endpoint(
        pool: &PgPool,
        endpoint: &str,
    ) -> Result<Option<Webhook>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM webhooks WHERE endpoint = $1");
        sqlx::query_as::<_, Webhook>(&query)
            .bind(endpoint)
            .fetch_optional(pool)
            .await
    }

    /// Replace the signing secret, returning the updated row. Deliveries
    /// signed with the old secret are rejected from this point on.
    pub async fn rotate_secret(
        pool: &PgPool,
        id: DbId,
        secret: &str,
    ) -> Result<Option<Webhook>, sqlx::Error> {
        let query = format!(
            "UPDATE webhooks SET secret = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Webhook>(&query)
            .bind(secret)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
