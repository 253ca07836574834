//! Round trips through both blob store implementations.

use bytes::Bytes;

use keepsake_core::error::ErrorKind;
use keepsake_core::traits::BlobStore;
use keepsake_storage::{LocalBlobStore, MemoryBlobStore};

#[tokio::test]
async fn test_local_store_writes_nested_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::new(dir.path().join("photos"), "https://cdn.test/p")
        .await
        .unwrap();
    assert!(store.health_check().await.unwrap());

    let key = "album-1/1733011200000_abc1234.jpg";
    store.write(key, Bytes::from_static(b"jpeg")).await.unwrap();
    assert!(store.exists(key).await.unwrap());
    assert!(dir.path().join("photos/album-1").is_dir());
    assert_eq!(store.read_bytes(key).await.unwrap(), Bytes::from_static(b"jpeg"));
    assert_eq!(
        store.public_url(key),
        "https://cdn.test/p/album-1/1733011200000_abc1234.jpg"
    );

    store.delete(key).await.unwrap();
    assert!(!store.exists(key).await.unwrap());
    // Deleting twice is not an error.
    store.delete(key).await.unwrap();
}

#[tokio::test]
async fn test_local_store_rejects_traversal() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::new(dir.path(), "file://x").await.unwrap();
    let err = store
        .write("../escape.jpg", Bytes::from_static(b"x"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_local_store_missing_blob() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::new(dir.path(), "file://x").await.unwrap();
    let err = store.read_bytes("nope.jpg").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_memory_store_failure_switches() {
    let store = MemoryBlobStore::new();
    store.write("a/1.jpg", Bytes::from_static(b"1")).await.unwrap();
    assert_eq!(store.keys(), vec!["a/1.jpg".to_string()]);

    store.set_fail_deletes(true);
    assert_eq!(
        store.delete("a/1.jpg").await.unwrap_err().kind,
        ErrorKind::Storage
    );
    assert_eq!(store.len(), 1);

    store.set_fail_writes(true);
    assert!(store.write("a/2.jpg", Bytes::new()).await.is_err());
    assert_eq!(store.public_url("a/1.jpg"), "memory://photos/a/1.jpg");
}
