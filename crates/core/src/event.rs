//! Trigger detection for inbound Ghost payloads.
//!
//! Ghost does not name the event in the body; the shape of the payload
//! identifies it. Detection mirrors the delivery format: `member` and
//! `post`/`page` envelopes with `current`/`previous` snapshots.

use serde_json::Value;

use crate::son::TriggerType;

/// Determine the trigger type of a webhook payload from its shape.
///
/// Returns `None` for shapes that match no known event; ingest logs and
/// drops those without attempting a rule match.
pub fn detect_trigger(payload: &Value) -> Option<TriggerType> {
    if let Some(member) = payload.get("member") {
        if member.get("current").is_some_and(Value::is_object) {
            let previous_non_empty = member
                .get("previous")
                .and_then(Value::as_object)
                .is_some_and(|p| !p.is_empty());
            return Some(if previous_non_empty {
                TriggerType::MemberUpdated
            } else {
                TriggerType::MemberCreated
            });
        }
        return Some(TriggerType::MemberDeleted);
    }

    if let Some(status) = current_status(payload, "post") {
        return match status {
            "published" => Some(TriggerType::PostPublished),
            "scheduled" => Some(TriggerType::PostScheduled),
            _ => None,
        };
    }

    if current_status(payload, "page") == Some("published") {
        return Some(TriggerType::PagePublished);
    }

    None
}

/// `payload.<entity>.current.status` as a str, if present.
fn current_status<'a>(payload: &'a Value, entity: &str) -> Option<&'a str> {
    payload
        .get(entity)?
        .get("current")?
        .get("status")?
        .as_str()
}

/// The member email an action targets: `member.current.email`.
pub fn member_email(payload: &Value) -> Option<&str> {
    payload.get("member")?.get("current")?.get("email")?.as_str()
}

/// The member display name, if any: `member.current.name`.
pub fn member_name(payload: &Value) -> Option<&str> {
    payload.get("member")?.get("current")?.get("name")?.as_str()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn member_created_has_current_and_empty_previous() {
        let payload = json!({
            "member": { "current": { "email": "a@b.c" }, "previous": {} }
        });
        assert_eq!(detect_trigger(&payload), Some(TriggerType::MemberCreated));
    }

    #[test]
    fn member_created_without_previous_key() {
        let payload = json!({ "member": { "current": { "email": "a@b.c" } } });
        assert_eq!(detect_trigger(&payload), Some(TriggerType::MemberCreated));
    }

    #[test]
    fn member_updated_has_non_empty_previous() {
        let payload = json!({
            "member": {
                "current": { "email": "a@b.c", "name": "New" },
                "previous": { "name": "Old" }
            }
        });
        assert_eq!(detect_trigger(&payload), Some(TriggerType::MemberUpdated));
    }

    #[test]
    fn member_deleted_has_no_current() {
        let payload = json!({ "member": { "previous": { "email": "a@b.c" } } });
        assert_eq!(detect_trigger(&payload), Some(TriggerType::MemberDeleted));
    }

    #[test]
    fn post_published_and_scheduled() {
        let published = json!({ "post": { "current": { "status": "published" } } });
        let scheduled = json!({ "post": { "current": { "status": "scheduled" } } });
        assert_eq!(detect_trigger(&published), Some(TriggerType::PostPublished));
        assert_eq!(detect_trigger(&scheduled), Some(TriggerType::PostScheduled));
    }

    #[test]
    fn page_published() {
        let payload = json!({ "page": { "current": { "status": "published" } } });
        assert_eq!(detect_trigger(&payload), Some(TriggerType::PagePublished));
    }

    #[test]
    fn unknown_shapes_yield_none() {
        for payload in [
            json!({}),
            json!({ "post": { "current": { "status": "draft" } } }),
            json!({ "page": { "current": { "status": "draft" } } }),
            json!({ "tag": { "current": { "name": "news" } } }),
        ] {
            assert_eq!(detect_trigger(&payload), None, "{payload}");
        }
    }

    #[test]
    fn extracts_member_email_and_name() {
        let payload = json!({
            "member": { "current": { "email": "a@b.c", "name": "Ada" } }
        });
        assert_eq!(member_email(&payload), Some("a@b.c"));
        assert_eq!(member_name(&payload), Some("Ada"));
        assert_eq!(member_email(&json!({})), None);
    }
}
