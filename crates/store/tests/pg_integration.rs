//! Integration tests for PgStore.
//! Run with: DATABASE_URL=... cargo test -p sahpaathi-store -- --ignored pg_

#![allow(clippy::unwrap_used, reason = "integration test code")]

use chrono::Utc;
use sahpaathi_core::{ChatMessage, Role, Session, Teacher};
use sahpaathi_store::PgStore;
use sahpaathi_store::traits::{MessageStore, SessionStore, TeacherStore};
use uuid::Uuid;

async fn create_pg_store() -> PgStore {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for PgStore integration tests");
    PgStore::connect(&url).await.expect("Failed to connect to PostgreSQL")
}

fn unique_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

#[tokio::test]
#[ignore]
async fn pg_session_roundtrip() {
    let store = create_pg_store().await;
    let id = unique_id("session");
    let now = Utc::now();

    store.insert_session(&Session::new(id.clone(), "Algebra".to_owned(), now)).await.unwrap();

    let listed = store.list_sessions().await.unwrap();
    assert!(listed.iter().any(|s| s.session_id == id));

    assert!(store.rename_session(&id, "Geometry", Utc::now()).await.unwrap());
    let renamed = store
        .list_sessions()
        .await
        .unwrap()
        .into_iter()
        .find(|s| s.session_id == id)
        .unwrap();
    assert_eq!(renamed.name, "Geometry");
    assert!(renamed.updated_at >= renamed.created_at);

    assert!(store.delete_session(&id).await.unwrap());
    assert!(!store.delete_session(&id).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn pg_message_ordering_and_bulk_delete() {
    let store = create_pg_store().await;
    let id = unique_id("session");
    let now = Utc::now();
    store.insert_session(&Session::new(id.clone(), "Order".to_owned(), now)).await.unwrap();

    for (i, content) in ["one", "two", "three"].iter().enumerate() {
        let message = ChatMessage {
            session_id: id.clone(),
            role: if i % 2 == 0 { Role::User } else { Role::Assistant },
            content: (*content).to_owned(),
            timestamp: now + chrono::Duration::milliseconds(i as i64),
        };
        store.append_message(&message).await.unwrap();
    }

    let history = store.session_history(&id).await.unwrap();
    let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "two", "three"]);

    store.delete_session_messages(&id).await.unwrap();
    assert!(store.session_history(&id).await.unwrap().is_empty());
    store.delete_session(&id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn pg_teacher_roundtrip_and_builtin_protection() {
    let store = create_pg_store().await;
    let id = unique_id("teacher");
    let teacher =
        Teacher::new(id.clone(), "Integration Coach".to_owned(), "prompt".to_owned(), true, Utc::now());
    store.insert_teacher(&teacher).await.unwrap();

    assert!(store.update_teacher_prompt(&id, "updated", Utc::now()).await.unwrap());
    assert_eq!(store.get_teacher(&id).await.unwrap().unwrap().prompt, "updated");

    // A non-custom persona survives delete attempts.
    let builtin_id = unique_id("builtin");
    let builtin = Teacher::new(
        builtin_id.clone(),
        "Immovable".to_owned(),
        "prompt".to_owned(),
        false,
        Utc::now(),
    );
    store.insert_teacher(&builtin).await.unwrap();
    assert!(!store.delete_teacher(&builtin_id).await.unwrap());
    assert!(store.get_teacher(&builtin_id).await.unwrap().is_some());

    assert!(store.delete_teacher(&id).await.unwrap());

    // Cleanup of the sentinel requires bypassing the custom-only guard.
    let url = std::env::var("DATABASE_URL").unwrap();
    let pool = sqlx::postgres::PgPoolOptions::new().max_connections(1).connect(&url).await.unwrap();
    sqlx::query("DELETE FROM teachers WHERE teacher_id = $1")
        .bind(&builtin_id)
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore]
async fn pg_seeding_is_idempotent() {
    // Connecting twice must not duplicate the built-in personas: the seed
    // only fires against an empty collection.
    let first = create_pg_store().await;
    let before = first
        .list_teachers()
        .await
        .unwrap()
        .into_iter()
        .filter(|t| !t.is_custom)
        .count();

    let second = create_pg_store().await;
    let after = second
        .list_teachers()
        .await
        .unwrap()
        .into_iter()
        .filter(|t| !t.is_custom)
        .count();

    assert_eq!(before, after);
}
