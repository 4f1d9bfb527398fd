// ===========================
// tests/unit/storage_tests.rs
// ===========================
//! SQLite store behaviour across handles and restarts
use backend_lib::storage::{SqliteStorage, Storage, StoreError};
use blog_common::PostDraft;
use chrono::Utc;
use tempfile::tempdir;

fn draft(title: &str, body: &str) -> PostDraft {
    PostDraft {
        title: title.to_string(),
        body: body.to_string(),
    }
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blog.db");

    let post_id = {
        let store = SqliteStorage::open(&path).unwrap();
        let alice = store.create_user("alice", "hash").await.unwrap();
        store
            .create_post(alice.id, &draft("Persisted", "Still here"), Utc::now())
            .await
            .unwrap()
            .id
    };

    let store = SqliteStorage::open(&path).unwrap();
    let post = store.find_post_with_author(post_id).await.unwrap().unwrap();
    assert_eq!(post.post.title, "Persisted");
    assert_eq!(post.author_username, "alice");
}

#[tokio::test]
async fn test_created_at_round_trips() {
    let store = SqliteStorage::open_in_memory().unwrap();
    let alice = store.create_user("alice", "hash").await.unwrap();

    let created = store
        .create_post(alice.id, &draft("Hi", "World"), Utc::now())
        .await
        .unwrap();
    let loaded = store.find_post(created.id).await.unwrap().unwrap();
    assert_eq!(loaded.created_at, created.created_at);
}

#[tokio::test]
async fn test_concurrent_duplicate_registration() {
    let store = SqliteStorage::open_in_memory().unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.create_user("alice", "hash").await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(StoreError::UsernameTaken) => {},
            Err(other) => panic!("unexpected store error: {other}"),
        }
    }
    assert_eq!(created, 1);
}

#[tokio::test]
async fn test_missing_rows_report_false() {
    let store = SqliteStorage::open_in_memory().unwrap();
    assert!(store.find_post(1).await.unwrap().is_none());
    assert!(!store.update_post(1, &draft("a", "b")).await.unwrap());
    assert!(!store.delete_post(1).await.unwrap());
}
