use super::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use tempfile::TempDir;

fn store_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("data").join("shaders.json")
}

fn read_file(path: &std::path::Path) -> HashMap<String, ShaderRecord> {
    let bytes = std::fs::read(path).expect("store file readable");
    serde_json::from_slice(&bytes).expect("store file is a JSON object")
}

/// Replaces the store's parent directory with a regular file so every rewrite fails.
fn break_parent_dir(path: &std::path::Path) {
    let parent = path.parent().expect("has parent");
    std::fs::remove_dir_all(parent).expect("remove parent");
    std::fs::write(parent, b"not a directory").expect("write blocker file");
}

#[tokio::test]
async fn test_open_creates_missing_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = store_path(&dir);

    let store = DurableStore::open(&path).await.expect("open");

    assert!(store.is_empty());
    assert_eq!(store.path(), path.as_path());
    assert_eq!(std::fs::read(&path).unwrap(), b"{}");
}

#[tokio::test]
async fn test_open_empty_file_is_empty_store() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("shaders.json");
    std::fs::write(&path, b"  \n").unwrap();

    let store = DurableStore::open(&path).await.expect("open");

    assert!(store.is_empty());
}

#[tokio::test]
async fn test_open_loads_existing_records() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("shaders.json");
    std::fs::write(
        &path,
        br#"{"abc123":{"source":"void main(){}","created":1702500000000}}"#,
    )
    .unwrap();

    let store = DurableStore::open(&path).await.expect("open");

    assert_eq!(store.len(), 1);
    assert_eq!(
        store.get("abc123"),
        Some(ShaderRecord::with_created("void main(){}", 1_702_500_000_000))
    );
}

#[tokio::test]
async fn test_open_rejects_corrupt_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("shaders.json");
    std::fs::write(&path, b"[1, 2, 3]").unwrap();

    let result = DurableStore::open(&path).await;

    assert!(matches!(result, Err(StorageError::Corrupt { .. })));
    assert_eq!(std::fs::read(&path).unwrap(), b"[1, 2, 3]");
}

#[tokio::test]
async fn test_insert_persists_full_map() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = store_path(&dir);
    let store = DurableStore::open(&path).await.expect("open");

    store
        .insert("first1", ShaderRecord::with_created("a", 1))
        .await
        .expect("insert");
    store
        .insert("second", ShaderRecord::with_created("b", 2))
        .await
        .expect("insert");

    let on_disk = read_file(&path);
    assert_eq!(on_disk.len(), 2);
    assert_eq!(on_disk["first1"].source, "a");
    assert_eq!(on_disk["second"].source, "b");
    assert!(!path.with_file_name("shaders.json.tmp").exists());
}

#[tokio::test]
async fn test_reopen_after_insert_returns_record() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = store_path(&dir);

    {
        let store = DurableStore::open(&path).await.expect("open");
        store
            .insert("keepme", ShaderRecord::with_created("void main(){}", 7))
            .await
            .expect("insert");
    }

    let reopened = DurableStore::open(&path).await.expect("reopen");
    assert_eq!(
        reopened.get("keepme"),
        Some(ShaderRecord::with_created("void main(){}", 7))
    );
}

#[tokio::test]
async fn test_insert_overwrites_existing_id() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = DurableStore::open(store_path(&dir)).await.expect("open");

    store
        .insert("dupdup", ShaderRecord::with_created("old", 1))
        .await
        .unwrap();
    store
        .insert("dupdup", ShaderRecord::with_created("new", 2))
        .await
        .unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.get("dupdup").unwrap().source, "new");
}

#[tokio::test]
async fn test_failed_persist_leaves_new_entry_out() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = store_path(&dir);
    let store = DurableStore::open(&path).await.expect("open");

    break_parent_dir(&path);

    let result = store
        .insert("lost01", ShaderRecord::with_created("x", 1))
        .await;

    assert!(matches!(result, Err(StorageError::Io(_))));
    assert!(!store.contains("lost01"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_failed_persist_keeps_previous_value() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = store_path(&dir);
    let store = DurableStore::open(&path).await.expect("open");
    store
        .insert("stable", ShaderRecord::with_created("original", 1))
        .await
        .unwrap();

    break_parent_dir(&path);

    let result = store
        .insert("stable", ShaderRecord::with_created("replacement", 2))
        .await;

    assert!(result.is_err());
    assert_eq!(
        store.get("stable"),
        Some(ShaderRecord::with_created("original", 1))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_do_not_lose_updates() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = store_path(&dir);
    let store = Arc::new(DurableStore::open(&path).await.expect("open"));

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .insert(
                        &format!("id{:04}", i),
                        ShaderRecord::with_created(format!("src {}", i), i),
                    )
                    .await
            })
        })
        .collect();

    for result in futures::future::join_all(tasks).await {
        result.expect("task").expect("insert");
    }

    assert_eq!(store.len(), 32);
    let on_disk = read_file(&path);
    assert_eq!(on_disk.len(), 32);
    for i in 0..32 {
        assert_eq!(on_disk[&format!("id{:04}", i)].source, format!("src {}", i));
    }
}

#[tokio::test]
async fn test_dropped_insert_never_exposes_unpersisted_record() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = store_path(&dir);
    let store = DurableStore::open(&path).await.expect("open");

    break_parent_dir(&path);

    for i in 0..200 {
        let id = format!("gone{:02}", i % 100);
        let pending = store.insert(&id, ShaderRecord::with_created("x", i));
        drop(pending.now_or_never());
    }

    let last = store.insert("last01", ShaderRecord::with_created("x", 0)).await;

    assert!(last.is_err());
    assert!(store.is_empty(), "in-memory map holds {} unpersisted records", store.len());
}

#[tokio::test]
async fn test_dropped_insert_still_completes_and_matches_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = store_path(&dir);
    let store = DurableStore::open(&path).await.expect("open");

    let pending = store.insert("early1", ShaderRecord::with_created("dropped", 1));
    drop(pending.now_or_never());

    store
        .insert("later1", ShaderRecord::with_created("awaited", 2))
        .await
        .expect("insert");

    let on_disk = read_file(&path);
    assert_eq!(on_disk.len(), store.len());
    for (id, record) in &on_disk {
        assert_eq!(store.get(id).as_ref(), Some(record));
    }
    assert!(store.contains("later1"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_never_see_record_whose_persist_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = store_path(&dir);
    let store = Arc::new(DurableStore::open(&path).await.expect("open"));

    break_parent_dir(&path);

    let done = Arc::new(AtomicBool::new(false));
    let reader = {
        let store = Arc::clone(&store);
        let done = Arc::clone(&done);
        tokio::spawn(async move {
            let mut seen = 0usize;
            while !done.load(Ordering::SeqCst) {
                if store.contains("doomed") {
                    seen += 1;
                }
                tokio::task::yield_now().await;
            }
            seen
        })
    };

    for i in 0..50 {
        let result = store
            .insert("doomed", ShaderRecord::with_created("x", i))
            .await;
        assert!(result.is_err());
    }
    done.store(true, Ordering::SeqCst);

    assert_eq!(reader.await.expect("reader"), 0);
}

#[tokio::test]
async fn test_failed_rename_removes_temp_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = store_path(&dir);
    let store = DurableStore::open(&path).await.expect("open");

    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("occupied"), b"x").unwrap();

    let result = store
        .insert("blocked", ShaderRecord::with_created("x", 1))
        .await;

    assert!(matches!(result, Err(StorageError::Io(_))));
    assert!(!path.with_file_name("shaders.json.tmp").exists());
    assert!(store.is_empty());
}
