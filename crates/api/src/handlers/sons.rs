//! Handlers for automation rule (son) management.
//!
//! All writes are validated before touching the database; the executor
//! never sees a rule that fails [`validate_son`].

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use ghostmonk_core::error::CoreError;
use ghostmonk_core::son::validate_son;
use ghostmonk_core::types::DbId;
use ghostmonk_db::models::son::{CreateSon, UpdateSon};
use ghostmonk_db::repositories::{ActivityRepo, SonRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Default delay token for rules created without one.
const DEFAULT_DELAY: &str = "0s";

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// POST /api/sons
pub async fn create_son(
    State(state): State<AppState>,
    Json(input): Json<CreateSon>,
) -> AppResult<impl IntoResponse> {
    let delay = input.delay.as_deref().unwrap_or(DEFAULT_DELAY);
    let enabled = input.enabled.unwrap_or(true);
    validate_son(&input.name, input.trigger, delay, &input.actions)?;

    let son = SonRepo::create(
        &state.pool,
        &input.name,
        input.trigger.as_str(),
        delay,
        enabled,
        &input.actions,
    )
    .await?;

    ActivityRepo::log(
        &state.pool,
        "son_created",
        &format!("Created son '{}'", son.name),
    )
    .await?;
    tracing::info!(son_id = son.id, name = %son.name, "Son created");

    Ok(Json(DataResponse { data: son }))
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// GET /api/sons
pub async fn list_sons(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let sons = SonRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: sons }))
}

/// GET /api/sons/{id}
pub async fn get_son(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let son = SonRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "son", id })?;
    Ok(Json(DataResponse { data: son }))
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// PUT /api/sons/{id}
///
/// Partial update: absent fields keep their stored values. The merged
/// rule is re-validated as a whole before the write.
pub async fn update_son(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSon>,
) -> AppResult<impl IntoResponse> {
    let existing = SonRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "son", id })?;

    let name = input.name.unwrap_or(existing.name);
    let trigger = match input.trigger {
        Some(trigger) => trigger,
        None => existing.trigger_event.parse()?,
    };
    let delay = input.delay.unwrap_or(existing.delay);
    let enabled = input.enabled.unwrap_or(existing.enabled);
    let actions = input.actions.unwrap_or(existing.actions.0);
    validate_son(&name, trigger, &delay, &actions)?;

    let son = SonRepo::update(
        &state.pool,
        id,
        &name,
        trigger.as_str(),
        &delay,
        enabled,
        &actions,
    )
    .await?
    .ok_or(CoreError::NotFound { entity: "son", id })?;

    ActivityRepo::log(
        &state.pool,
        "son_updated",
        &format!("Updated son '{}'", son.name),
    )
    .await?;
    tracing::info!(son_id = son.id, name = %son.name, "Son updated");

    Ok(Json(DataResponse { data: son }))
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// DELETE /api/sons/{id}
///
/// Execution logs keep the rule's id but outlive the rule itself;
/// invocations already scheduled will finalize as warnings.
pub async fn delete_son(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let son = SonRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "son", id })?;

    if !SonRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "son", id }));
    }

    ActivityRepo::log(
        &state.pool,
        "son_deleted",
        &format!("Deleted son '{}'", son.name),
    )
    .await?;
    tracing::info!(son_id = id, name = %son.name, "Son deleted");

    Ok(Json(DataResponse {
        data: serde_json::json!({ "deleted": true }),
    }))
}
