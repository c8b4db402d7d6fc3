//! listmonk mailing-list integration.
//!
//! The engine talks to the mailing list through the [`MailingList`]
//! trait so tests can substitute a recording fake; [`ListmonkClient`]
//! is the production implementation against the listmonk REST API.

mod client;
mod error;

pub use client::ListmonkClient;
pub use error::ListmonkError;

use async_trait::async_trait;
use ghostmonk_core::types::Timestamp;
use serde_json::Value;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// One transactional send through the listmonk `/api/tx` endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionalEmail {
    pub subscriber_email: String,
    pub template_id: i64,
    /// Template variables, merged by the caller.
    pub data: Value,
    /// Extra SMTP headers, in listmonk's list-of-maps shape.
    pub headers: Vec<HashMap<String, String>>,
}

/// Subscriber details captured from a member event.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriberUpsert {
    pub email: String,
    pub name: String,
    pub lists: Vec<i64>,
    /// listmonk subscription status, `enabled` unless overridden.
    pub status: String,
    /// Free-form attributes (location, labels) stored on the subscriber.
    pub attribs: Value,
}

/// A campaign to create and schedule in one step.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignDraft {
    pub name: String,
    pub subject: String,
    pub body: String,
    pub lists: Vec<i64>,
    pub template_id: i64,
    pub content_type: String,
    pub send_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Whether an upsert created a new subscriber or updated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberOutcome {
    Created,
    Updated,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Operations the action executor needs from the mailing list.
#[async_trait]
pub trait MailingList: Send + Sync {
    /// Send a single transactional email.
    async fn send_transactional_email(
        &self,
        email: &TransactionalEmail,
    ) -> Result<(), ListmonkError>;

    /// Create the subscriber or, if the email is already known, merge
    /// the list memberships onto the existing record.
    async fn upsert_subscriber(
        &self,
        subscriber: &SubscriberUpsert,
    ) -> Result<SubscriberOutcome, ListmonkError>;

    /// Create a campaign and schedule it for its `send_at`. Returns the
    /// listmonk campaign id.
    async fn create_campaign(&self, draft: &CampaignDraft) -> Result<i64, ListmonkError>;
}
