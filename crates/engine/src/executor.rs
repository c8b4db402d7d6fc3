//! Action executor: runs a claimed son execution to a terminal status.
//!
//! One invocation runs single-threaded, actions strictly in pipeline
//! order, fail-fast. Every attempted action writes exactly one
//! action_execution_logs row before the run advances; actions after the
//! first failure are never attempted and leave no rows.

use std::sync::Arc;

use chrono::{Duration, Utc};
use ghostmonk_core::event::{member_email, member_name};
use ghostmonk_core::son::{action_status, execution_status, Action, TriggerType};
use ghostmonk_core::types::Timestamp;
use ghostmonk_db::models::son::Son;
use ghostmonk_db::models::son_execution_log::SonExecutionLog;
use ghostmonk_db::repositories::{ActionLogRepo, SonExecutionRepo, SonRepo};
use ghostmonk_db::DbPool;
use ghostmonk_listmonk::{
    CampaignDraft, MailingList, SubscriberOutcome, SubscriberUpsert, TransactionalEmail,
};
use serde_json::Value;

/// Default subscription status for upserted members.
const DEFAULT_SUBSCRIBER_STATUS: &str = "enabled";

/// Campaigns whose send time is absent or already past go out shortly
/// after creation, not immediately, so an operator can still intervene.
const CAMPAIGN_SEND_GRACE_MINUTES: i64 = 5;

/// Outcome of one action attempt.
enum ActionOutcome {
    Success,
    /// Logged, pipeline continues.
    Warning(String),
    /// Logged, pipeline stops, parent marked failure.
    Failure(String),
}

/// Runs claimed executions against the mailing list.
pub struct Executor {
    pool: DbPool,
    mailing_list: Arc<dyn MailingList>,
}

impl Executor {
    pub fn new(pool: DbPool, mailing_list: Arc<dyn MailingList>) -> Self {
        Self { pool, mailing_list }
    }

    /// Drive one claimed execution to its terminal status.
    ///
    /// Rule-level problems (deleted, disabled, failing actions) are
    /// recorded on the execution row; only database errors bubble up.
    pub async fn execute(&self, execution: &SonExecutionLog) -> Result<(), sqlx::Error> {
        // The rule is re-read at fire time: edits between scheduling and
        // firing take effect, deletion and disabling retract the run.
        let son = match SonRepo::find_by_id(&self.pool, execution.son_id).await? {
            Some(son) => son,
            None => {
                tracing::warn!(
                    execution_id = execution.id,
                    son_id = execution.son_id,
                    "son deleted before execution",
                );
                SonExecutionRepo::finalize(
                    &self.pool,
                    execution.id,
                    execution_status::WARNING,
                    "son deleted before execution",
                )
                .await?;
                return Ok(());
            }
        };

        if !son.enabled {
            tracing::warn!(
                execution_id = execution.id,
                son_id = son.id,
                "son disabled before execution",
            );
            SonExecutionRepo::finalize(
                &self.pool,
                execution.id,
                execution_status::WARNING,
                "son disabled before execution",
            )
            .await?;
            return Ok(());
        }

        let payload = &execution.payload.0;
        for action in son.actions.0.iter() {
            let outcome = self.run_action(&son, action, payload).await;
            let (status, message) = match &outcome {
                ActionOutcome::Success => (action_status::SUCCESS, String::new()),
                ActionOutcome::Warning(msg) => (action_status::WARNING, msg.clone()),
                ActionOutcome::Failure(msg) => (action_status::FAILURE, msg.clone()),
            };
            ActionLogRepo::create(&self.pool, execution.id, action.type_name(), status, &message)
                .await?;

            if let ActionOutcome::Failure(msg) = outcome {
                tracing::error!(
                    execution_id = execution.id,
                    son_id = son.id,
                    action = action.type_name(),
                    error = %msg,
                    "action failed, aborting pipeline",
                );
                SonExecutionRepo::finalize(&self.pool, execution.id, execution_status::FAILURE, &msg)
                    .await?;
                return Ok(());
            }
        }

        SonExecutionRepo::finalize(&self.pool, execution.id, execution_status::SUCCESS, "").await?;
        tracing::info!(execution_id = execution.id, son_id = son.id, "son executed");
        Ok(())
    }

    async fn run_action(&self, son: &Son, action: &Action, payload: &Value) -> ActionOutcome {
        match action {
            Action::SendTransactionalEmail {
                template_id,
                headers,
                data,
            } => {
                let Some(email) = member_email(payload) else {
                    return ActionOutcome::Failure("member email missing from payload".into());
                };
                let request = TransactionalEmail {
                    subscriber_email: email.to_string(),
                    template_id: *template_id,
                    data: merge_data(payload, data.as_ref()),
                    headers: headers.clone().unwrap_or_default(),
                };
                match self.mailing_list.send_transactional_email(&request).await {
                    Ok(()) => ActionOutcome::Success,
                    Err(e) => ActionOutcome::Failure(e.to_string()),
                }
            }

            Action::ManageSubscriber { lists, status } => {
                if son.trigger_event != TriggerType::MemberCreated.as_str() {
                    return ActionOutcome::Warning(format!(
                        "skipped: manage_subscriber only runs for member_created, \
                         triggered by {}",
                        son.trigger_event
                    ));
                }
                let Some(email) = member_email(payload) else {
                    return ActionOutcome::Failure("member email missing from payload".into());
                };
                let subscriber = SubscriberUpsert {
                    email: email.to_string(),
                    name: member_name(payload).unwrap_or_default().to_string(),
                    lists: lists.clone(),
                    status: status
                        .clone()
                        .unwrap_or_else(|| DEFAULT_SUBSCRIBER_STATUS.to_string()),
                    attribs: member_attribs(payload),
                };
                match self.mailing_list.upsert_subscriber(&subscriber).await {
                    Ok(SubscriberOutcome::Created) => ActionOutcome::Success,
                    Ok(SubscriberOutcome::Updated) => ActionOutcome::Warning(
                        "subscriber already existed; list memberships merged".into(),
                    ),
                    Err(e) => ActionOutcome::Failure(e.to_string()),
                }
            }

            Action::CreateCampaign {
                name,
                subject,
                body,
                lists,
                template_id,
                send_at,
                content_type,
            } => {
                let draft = CampaignDraft {
                    name: unique_campaign_name(name),
                    subject: render_template(subject, payload),
                    body: render_template(body, payload),
                    lists: lists.clone(),
                    template_id: *template_id,
                    content_type: content_type.clone().unwrap_or_else(|| "richtext".to_string()),
                    send_at: effective_send_at(*send_at),
                };
                match self.mailing_list.create_campaign(&draft).await {
                    Ok(_) => ActionOutcome::Success,
                    Err(e) => ActionOutcome::Failure(e.to_string()),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Template data for transactional sends: the event payload with the
/// action's explicit `data` keys layered on top.
fn merge_data(payload: &Value, data: Option<&Value>) -> Value {
    let mut merged = payload.clone();
    if let (Some(base), Some(Value::Object(extra))) = (merged.as_object_mut(), data) {
        for (key, value) in extra {
            base.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Geolocation and labels from the member snapshot, stored as
/// subscriber attributes.
fn member_attribs(payload: &Value) -> Value {
    let mut attribs = serde_json::Map::new();
    if let Some(current) = payload.get("member").and_then(|m| m.get("current")) {
        for key in ["geolocation", "labels", "status"] {
            if let Some(value) = current.get(key) {
                if !value.is_null() {
                    attribs.insert(key.to_string(), value.clone());
                }
            }
        }
    }
    Value::Object(attribs)
}

/// Substitute `{{field}}` placeholders with string/number fields of the
/// event's `post.current` (or `page.current`) snapshot.
fn render_template(template: &str, payload: &Value) -> String {
    let snapshot = payload
        .get("post")
        .or_else(|| payload.get("page"))
        .and_then(|entity| entity.get("current"))
        .and_then(Value::as_object);

    let Some(fields) = snapshot else {
        return template.to_string();
    };

    let mut rendered = template.to_string();
    for (key, value) in fields {
        let replacement = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => continue,
        };
        rendered = rendered.replace(&format!("{{{{{key}}}}}"), &replacement);
        rendered = rendered.replace(&format!("{{{{ {key} }}}}"), &replacement);
    }
    rendered
}

/// Campaign names must be unique per listmonk instance; reruns of the
/// same rule get a timestamp + random suffix.
fn unique_campaign_name(base: &str) -> String {
    let suffix: u16 = rand::random();
    format!("{base} [{}-{suffix:04x}]", Utc::now().timestamp())
}

/// A send time in the past (or absent) is pushed out by the grace
/// window instead of firing immediately.
fn effective_send_at(requested: Option<Timestamp>) -> Timestamp {
    let fallback = Utc::now() + Duration::minutes(CAMPAIGN_SEND_GRACE_MINUTES);
    match requested {
        Some(at) if at > Utc::now() => at,
        _ => fallback,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_data_layers_action_keys_over_payload() {
        let payload = json!({ "member": { "current": { "email": "a@b.c" } }, "k": 1 });
        let merged = merge_data(&payload, Some(&json!({ "k": 2, "extra": true })));
        assert_eq!(merged["k"], json!(2));
        assert_eq!(merged["extra"], json!(true));
        assert_eq!(merged["member"]["current"]["email"], json!("a@b.c"));
    }

    #[test]
    fn render_template_substitutes_post_fields() {
        let payload = json!({
            "post": { "current": { "title": "Hello", "slug": "hello", "id": 7 } }
        });
        assert_eq!(
            render_template("<h1>{{title}}</h1> ({{ slug }}, #{{id}})", &payload),
            "<h1>Hello</h1> (hello, #7)"
        );
    }

    #[test]
    fn render_template_leaves_unknown_placeholders() {
        let payload = json!({ "post": { "current": { "title": "Hello" } } });
        assert_eq!(render_template("{{title}} {{missing}}", &payload), "Hello {{missing}}");
        assert_eq!(render_template("{{title}}", &json!({})), "{{title}}");
    }

    #[test]
    fn member_attribs_carries_geolocation() {
        let payload = json!({
            "member": {
                "current": {
                    "email": "a@b.c",
                    "geolocation": { "country": "NL" },
                    "labels": ["vip"],
                    "uuid": "ignored"
                }
            }
        });
        let attribs = member_attribs(&payload);
        assert_eq!(attribs["geolocation"]["country"], json!("NL"));
        assert_eq!(attribs["labels"], json!(["vip"]));
        assert!(attribs.get("uuid").is_none());
    }

    #[test]
    fn past_send_at_is_pushed_out() {
        let past = Utc::now() - Duration::hours(1);
        assert!(effective_send_at(Some(past)) > Utc::now());
        assert!(effective_send_at(None) > Utc::now());

        let future = Utc::now() + Duration::hours(2);
        assert_eq!(effective_send_at(Some(future)), future);
    }

    #[test]
    fn campaign_names_get_unique_suffixes() {
        let a = unique_campaign_name("Digest");
        let b = unique_campaign_name("Digest");
        assert!(a.starts_with("Digest ["));
        assert_ne!(a, b);
    }
}
