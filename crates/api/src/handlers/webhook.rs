//! Handlers for the public inbound webhook and its configuration.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use ghostmonk_core::signature::{generate_secret, mask_secret};
use ghostmonk_db::repositories::WebhookRepo;
use ghostmonk_engine::ingest::IngestRequest;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::query::RevealParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Header map as a JSON object with lowercase keys, the shape stored on
/// webhook_logs rows and replayed later.
fn headers_to_json(headers: &HeaderMap) -> Value {
    let mut map = serde_json::Map::new();
    for (name, value) in headers {
        map.insert(
            name.as_str().to_string(),
            Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
        );
    }
    Value::Object(map)
}

// ---------------------------------------------------------------------------
// Inbound deliveries
// ---------------------------------------------------------------------------

/// POST /webhook/{endpoint}
///
/// The public Ghost-facing endpoint. The body is taken raw so the
/// signature verifies over the exact bytes delivered.
pub async fn receive_webhook(
    State(state): State<AppState>,
    Path(endpoint): Path<String>,
    headers: HeaderMap,
    body: String,
) -> AppResult<impl IntoResponse> {
    let outcome = state
        .ingest
        .handle(IngestRequest {
            path: format!("/webhook/{endpoint}"),
            endpoint,
            method: "POST".to_string(),
            headers: headers_to_json(&headers),
            body,
            verify_signature: true,
        })
        .await?;

    let status = StatusCode::from_u16(outcome.status_code as u16)
        .map_err(|_| AppError::InternalError("invalid ingest status code".into()))?;
    Ok((status, Json(outcome.response)))
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// GET /api/webhook-info
///
/// The endpoint URL to paste into Ghost, with the secret masked unless
/// `?reveal=true`.
pub async fn webhook_info(
    State(state): State<AppState>,
    Query(params): Query<RevealParams>,
) -> AppResult<impl IntoResponse> {
    let webhook = WebhookRepo::get(&state.pool)
        .await?
        .ok_or_else(|| AppError::InternalError("webhook configuration missing".into()))?;

    let secret = if params.reveal {
        webhook.secret.clone()
    } else {
        mask_secret(&webhook.secret)
    };

    Ok(Json(DataResponse {
        data: json!({
            "endpoint": webhook.endpoint,
            "url": format!("{}/webhook/{}", state.config.public_url, webhook.endpoint),
            "secret": secret,
        }),
    }))
}

/// POST /api/webhook-info/rotate
///
/// Replace the signing secret. The new secret is returned unmasked this
/// one time; deliveries signed with the old secret are rejected from
/// here on.
pub async fn rotate_webhook_secret(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let webhook = WebhookRepo::get(&state.pool)
        .await?
        .ok_or_else(|| AppError::InternalError("webhook configuration missing".into()))?;

    let secret = generate_secret();
    let rotated = WebhookRepo::rotate_secret(&state.pool, webhook.id, &secret)
        .await?
        .ok_or_else(|| AppError::InternalError("webhook configuration missing".into()))?;

    tracing::info!(webhook_id = rotated.id, "Webhook secret rotated");

    Ok(Json(DataResponse {
        data: json!({
            "endpoint": rotated.endpoint,
            "url": format!("{}/webhook/{}", state.config.public_url, rotated.endpoint),
            "secret": rotated.secret,
        }),
    }))
}
