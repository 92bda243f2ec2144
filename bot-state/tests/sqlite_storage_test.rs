//! Integration tests for [`bot_state::SqliteStorage`].
//!
//! Uses a SQLite file in a temporary directory; no external DB.

use bot_state::{SqliteStorage, Storage, StorageError, ETAG_KEY};
use serde_json::json;
use std::collections::HashMap;
use tempfile::TempDir;

async fn open(dir: &TempDir) -> SqliteStorage {
    let path = dir.path().join("state.db");
    SqliteStorage::new(path.to_str().expect("utf-8 temp path"))
        .await
        .expect("Failed to create storage")
}

/// **Test: Written document is read back with an eTag; missing keys are absent.**
#[tokio::test]
async fn test_write_and_read() {
    let dir = TempDir::new().unwrap();
    let storage = open(&dir).await;

    storage
        .write(HashMap::from([(
            "test/users/u1".to_string(),
            json!({ "UserProfile": { "handle_name": "ALICE" } }),
        )]))
        .await
        .unwrap();

    let found = storage
        .read(&["test/users/u1".to_string(), "test/users/u2".to_string()])
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    let doc = &found["test/users/u1"];
    assert_eq!(doc["UserProfile"]["handle_name"], json!("ALICE"));
    assert!(doc[ETAG_KEY].is_string());
}

/// **Test: Data survives reopening the database file.**
#[tokio::test]
async fn test_persists_across_instances() {
    let dir = TempDir::new().unwrap();
    {
        let storage = open(&dir).await;
        storage
            .write(HashMap::from([("k".to_string(), json!({ "v": 1 }))]))
            .await
            .unwrap();
    }

    let storage = open(&dir).await;
    let found = storage.read(&["k".to_string()]).await.unwrap();
    assert_eq!(found["k"]["v"], json!(1));
}

/// **Test: Writing with a stale eTag fails; the stored document is unchanged.**
#[tokio::test]
async fn test_stale_etag_conflict() {
    let dir = TempDir::new().unwrap();
    let storage = open(&dir).await;

    storage
        .write(HashMap::from([("k".to_string(), json!({ "v": 1 }))]))
        .await
        .unwrap();
    let mut stale = storage.read(&["k".to_string()]).await.unwrap()["k"].clone();
    storage
        .write(HashMap::from([("k".to_string(), stale.clone())]))
        .await
        .unwrap();

    stale["v"] = json!(99);
    let result = storage
        .write(HashMap::from([("k".to_string(), stale)]))
        .await;
    assert!(matches!(result, Err(StorageError::ETagConflict { .. })));

    let found = storage.read(&["k".to_string()]).await.unwrap();
    assert_eq!(found["k"]["v"], json!(1));
}

/// **Test: delete removes the row.**
#[tokio::test]
async fn test_delete() {
    let dir = TempDir::new().unwrap();
    let storage = open(&dir).await;

    storage
        .write(HashMap::from([("k".to_string(), json!({}))]))
        .await
        .unwrap();
    storage.delete(&["k".to_string()]).await.unwrap();

    assert!(storage.read(&["k".to_string()]).await.unwrap().is_empty());
}
