//! Son (automation rule) domain model and validation.
//!
//! A Son binds a Ghost trigger to an ordered list of listmonk actions,
//! optionally delayed. Actions are a closed tagged union — every action
//! type has a statically known parameter shape, validated at the write
//! boundary so the executor never sees a malformed action.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::duration::parse_duration;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Triggers
// ---------------------------------------------------------------------------

/// Ghost event types a Son can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    MemberCreated,
    MemberDeleted,
    MemberUpdated,
    PagePublished,
    PostPublished,
    PostScheduled,
}

impl TriggerType {
    pub const ALL: &'static [TriggerType] = &[
        TriggerType::MemberCreated,
        TriggerType::MemberDeleted,
        TriggerType::MemberUpdated,
        TriggerType::PagePublished,
        TriggerType::PostPublished,
        TriggerType::PostScheduled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TriggerType::MemberCreated => "member_created",
            TriggerType::MemberDeleted => "member_deleted",
            TriggerType::MemberUpdated => "member_updated",
            TriggerType::PagePublished => "page_published",
            TriggerType::PostPublished => "post_published",
            TriggerType::PostScheduled => "post_scheduled",
        }
    }
}

impl std::str::FromStr for TriggerType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TriggerType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown trigger type: {s:?}")))
    }
}

impl std::fmt::Display for TriggerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// One typed step in a Son's pipeline.
///
/// Serialized as `{"type": "...", "parameters": {...}}`, the shape the
/// management UI reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "parameters", rename_all = "snake_case")]
pub enum Action {
    /// Send a transactional email through listmonk's `/api/tx`.
    SendTransactionalEmail {
        template_id: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        headers: Option<Vec<std::collections::HashMap<String, String>>>,
        /// Extra template data merged over the event payload.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
    /// Upsert the event's member as a subscriber of the given lists.
    ManageSubscriber {
        lists: Vec<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<String>,
    },
    /// Create and schedule a listmonk campaign.
    CreateCampaign {
        name: String,
        subject: String,
        body: String,
        lists: Vec<i64>,
        template_id: i64,
        /// RFC 3339; absent or in the past means "now + 5 minutes".
        #[serde(default, skip_serializing_if = "Option::is_none")]
        send_at: Option<crate::types::Timestamp>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
    },
}

impl Action {
    /// The wire name of this action's type, as logged per attempt.
    pub fn type_name(&self) -> &'static str {
        match self {
            Action::SendTransactionalEmail { .. } => "send_transactional_email",
            Action::ManageSubscriber { .. } => "manage_subscriber",
            Action::CreateCampaign { .. } => "create_campaign",
        }
    }

    /// Validate this action's parameters against its type's contract.
    fn validate(&self, trigger: TriggerType) -> Result<(), CoreError> {
        match self {
            Action::SendTransactionalEmail { template_id, .. } => {
                if *template_id <= 0 {
                    return Err(CoreError::Validation(
                        "send_transactional_email requires a template_id".into(),
                    ));
                }
            }
            Action::ManageSubscriber { lists, .. } => {
                if lists.is_empty() {
                    return Err(CoreError::Validation(
                        "manage_subscriber requires at least one target list".into(),
                    ));
                }
                // Only member_created events carry the member payload the
                // subscriber upsert needs.
                if trigger != TriggerType::MemberCreated {
                    return Err(CoreError::Validation(format!(
                        "manage_subscriber is only valid with the member_created \
                         trigger, not {trigger}"
                    )));
                }
            }
            Action::CreateCampaign {
                name,
                subject,
                body,
                lists,
                template_id,
                ..
            } => {
                if name.trim().is_empty() || subject.trim().is_empty() || body.trim().is_empty() {
                    return Err(CoreError::Validation(
                        "create_campaign requires name, subject and body".into(),
                    ));
                }
                if lists.is_empty() {
                    return Err(CoreError::Validation(
                        "create_campaign requires at least one target list".into(),
                    ));
                }
                if *template_id <= 0 {
                    return Err(CoreError::Validation(
                        "create_campaign requires a template_id".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Execution statuses
// ---------------------------------------------------------------------------

/// Terminal and in-flight statuses for son_execution_logs rows.
pub mod execution_status {
    pub const PENDING: &str = "pending";
    pub const SUCCESS: &str = "success";
    pub const FAILURE: &str = "failure";
    pub const WARNING: &str = "warning";
}

/// Statuses for action_execution_logs rows.
pub mod action_status {
    pub const SUCCESS: &str = "success";
    pub const FAILURE: &str = "failure";
    pub const WARNING: &str = "warning";
}

// ---------------------------------------------------------------------------
// Rule validation
// ---------------------------------------------------------------------------

/// Validate a Son definition at the write boundary.
///
/// Rejects anything the executor would have to guess about: empty
/// names, unknown triggers are already unrepresentable, bad delay
/// tokens, empty pipelines, and per-action parameter violations.
pub fn validate_son(
    name: &str,
    trigger: TriggerType,
    delay: &str,
    actions: &[Action],
) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    parse_duration(delay).map_err(|e| CoreError::Validation(e.to_string()))?;
    if actions.is_empty() {
        return Err(CoreError::Validation(
            "a son requires at least one action".into(),
        ));
    }
    for action in actions {
        action.validate(trigger)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn subscriber_action() -> Action {
        Action::ManageSubscriber {
            lists: vec![3],
            status: None,
        }
    }

    fn campaign_action() -> Action {
        Action::CreateCampaign {
            name: "Weekly digest".into(),
            subject: "News".into(),
            body: "<h1>{{title}}</h1>".into(),
            lists: vec![1, 2],
            template_id: 4,
            send_at: None,
            content_type: None,
        }
    }

    // -- serde shape ---------------------------------------------------------

    #[test]
    fn action_round_trips_ui_encoding() {
        let json = serde_json::json!({
            "type": "manage_subscriber",
            "parameters": { "lists": [3] }
        });
        let action: Action = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(action, subscriber_action());
        assert_eq!(serde_json::to_value(&action).unwrap(), json);
    }

    #[test]
    fn trigger_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(TriggerType::PostPublished).unwrap(),
            serde_json::json!("post_published")
        );
        assert_eq!("member_created".parse::<TriggerType>().unwrap().as_str(), "member_created");
        assert_matches!(
            "member_exploded".parse::<TriggerType>(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn unknown_action_type_is_rejected() {
        let json = serde_json::json!({
            "type": "launch_rocket",
            "parameters": {}
        });
        assert!(serde_json::from_value::<Action>(json).is_err());
    }

    // -- validate_son --------------------------------------------------------

    #[test]
    fn accepts_valid_son() {
        let actions = [subscriber_action()];
        assert!(validate_son("welcome", TriggerType::MemberCreated, "30m", &actions).is_ok());
    }

    #[test]
    fn rejects_empty_action_list() {
        assert_matches!(
            validate_son("welcome", TriggerType::MemberCreated, "0s", &[]),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn rejects_bad_delay_token() {
        let actions = [subscriber_action()];
        assert_matches!(
            validate_son("welcome", TriggerType::MemberCreated, "-3m", &actions),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn rejects_subscriber_action_on_wrong_trigger() {
        let actions = [subscriber_action()];
        let err = validate_son("late", TriggerType::PostPublished, "0s", &actions).unwrap_err();
        assert!(err.to_string().contains("member_created"));
    }

    #[test]
    fn rejects_subscriber_action_without_lists() {
        let actions = [Action::ManageSubscriber {
            lists: vec![],
            status: None,
        }];
        assert_matches!(
            validate_son("welcome", TriggerType::MemberCreated, "0s", &actions),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn rejects_campaign_without_subject() {
        let mut action = campaign_action();
        if let Action::CreateCampaign { subject, .. } = &mut action {
            *subject = " ".into();
        }
        assert_matches!(
            validate_son("digest", TriggerType::PostPublished, "0s", &[action]),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn accepts_campaign_on_post_published() {
        let actions = [campaign_action()];
        assert!(validate_son("digest", TriggerType::PostPublished, "1h", &actions).is_ok());
    }
}
