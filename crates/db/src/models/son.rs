//! Son (automation rule) row struct and DTOs.
//!
//! The actions pipeline is stored as a JSONB array of tagged
//! [`Action`] objects; the delay is stored as the compact token the UI
//! submits (validated at the write boundary).

use ghostmonk_core::son::{Action, TriggerType};
use ghostmonk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A son row from the `sons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Son {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "trigger")]
    pub trigger_event: String,
    pub delay: String,
    pub enabled: bool,
    pub actions: Json<Vec<Action>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for creating a new son.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSon {
    pub name: String,
    pub trigger: TriggerType,
    /// Compact duration token; defaults to `"0s"`.
    pub delay: Option<String>,
    pub enabled: Option<bool>,
    pub actions: Vec<Action>,
}

// ---------------------------------------------------------------------------
// Update DTO
// ---------------------------------------------------------------------------

/// Input for updating an existing son. All fields are optional; the
/// handler merges them over the stored row and re-validates the result.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSon {
    pub name: Option<String>,
    pub trigger: Option<TriggerType>,
    pub delay: Option<String>,
    pub enabled: Option<bool>,
    pub actions: Option<Vec<Action>>,
}
