//! Integration tests for rule and webhook repositories.
//!
//! Exercises the repository layer against a real database:
//! - Son CRUD and trigger-matched listing
//! - Unique name constraint
//! - Webhook bootstrap and secret rotation
//! - Activity feed ordering

use ghostmonk_core::son::Action;
use ghostmonk_db::repositories::{ActivityRepo, SonRepo, WebhookRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn welcome_actions() -> Vec<Action> {
    vec![Action::SendTransactionalEmail {
        template_id: 3,
        headers: None,
        data: None,
    }]
}

// ---------------------------------------------------------------------------
// Test: Son CRUD round trip
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_son_crud(pool: PgPool) {
    let son = SonRepo::create(
        &pool,
        "Welcome mail",
        "member_created",
        "5m",
        true,
        &welcome_actions(),
    )
    .await
    .unwrap();
    assert_eq!(son.name, "Welcome mail");
    assert_eq!(son.trigger_event, "member_created");
    assert_eq!(son.delay, "5m");
    assert!(son.enabled);
    assert_eq!(son.actions.0.len(), 1);

    let found = SonRepo::find_by_id(&pool, son.id).await.unwrap().unwrap();
    assert_eq!(found.name, "Welcome mail");

    let updated = SonRepo::update(
        &pool,
        son.id,
        "Welcome mail v2",
        "member_created",
        "1h",
        false,
        &welcome_actions(),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.name, "Welcome mail v2");
    assert_eq!(updated.delay, "1h");
    assert!(!updated.enabled);
    assert!(updated.updated_at >= son.updated_at);

    assert!(SonRepo::delete(&pool, son.id).await.unwrap());
    assert!(SonRepo::find_by_id(&pool, son.id).await.unwrap().is_none());
    assert!(!SonRepo::delete(&pool, son.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Test: Unique name constraint
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_son_duplicate_name_rejected(pool: PgPool) {
    SonRepo::create(&pool, "Dup", "member_created", "0s", true, &welcome_actions())
        .await
        .unwrap();

    let err = SonRepo::create(&pool, "Dup", "post_published", "0s", true, &welcome_actions())
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test: Trigger-matched listing honors enabled flag and creation order
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_enabled_by_trigger(pool: PgPool) {
    let first = SonRepo::create(&pool, "A", "member_created", "0s", true, &welcome_actions())
        .await
        .unwrap();
    let second = SonRepo::create(&pool, "B", "member_created", "0s", true, &welcome_actions())
        .await
        .unwrap();
    SonRepo::create(&pool, "C", "member_created", "0s", false, &welcome_actions())
        .await
        .unwrap();
    SonRepo::create(&pool, "D", "post_published", "0s", true, &welcome_actions())
        .await
        .unwrap();

    let matched = SonRepo::list_enabled_by_trigger(&pool, "member_created")
        .await
        .unwrap();
    let ids: Vec<i64> = matched.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

// ---------------------------------------------------------------------------
// Test: Webhook bootstrap is idempotent, rotation replaces the secret
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_webhook_ensure_and_rotate(pool: PgPool) {
    let webhook = WebhookRepo::ensure(&pool, "gm-endpoint", "s3cret").await.unwrap();
    assert_eq!(webhook.endpoint, "gm-endpoint");
    assert_eq!(webhook.secret, "s3cret");

    // Second ensure keeps the existing row and secret.
    let again = WebhookRepo::ensure(&pool, "gm-endpoint", "other").await.unwrap();
    assert_eq!(again.id, webhook.id);
    assert_eq!(again.secret, "s3cret");

    let by_endpoint = WebhookRepo::find_by_endpoint(&pool, "gm-endpoint")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_endpoint.id, webhook.id);
    assert!(WebhookRepo::find_by_endpoint(&pool, "nope")
        .await
        .unwrap()
        .is_none());

    let rotated = WebhookRepo::rotate_secret(&pool, webhook.id, "fresh")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rotated.secret, "fresh");
    assert!(rotated.updated_at >= webhook.updated_at);
}

// ---------------------------------------------------------------------------
// Test: Activity feed returns newest first
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_activity_feed_order(pool: PgPool) {
    ActivityRepo::log(&pool, "created", "Created 'Welcome mail'")
        .await
        .unwrap();
    ActivityRepo::log(&pool, "updated", "Updated 'Welcome mail'")
        .await
        .unwrap();
    ActivityRepo::log(&pool, "deleted", "Deleted 'Welcome mail'")
        .await
        .unwrap();

    let feed = ActivityRepo::list(&pool, 2).await.unwrap();
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].action_type, "deleted");
    assert_eq!(feed[1].action_type, "updated");
}
