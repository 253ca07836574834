//! In-memory blob store for tests and the offline demo.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use keepsake_core::error::AppError;
use keepsake_core::result::AppResult;
use keepsake_core::traits::BlobStore;

use crate::key::{join_url, validate_key};

/// Blobs held in a concurrent map.
#[derive(Debug)]
pub struct MemoryBlobStore {
    blobs: DashMap<String, Bytes>,
    base_url: String,
    fail_writes: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::with_base_url("memory://photos")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            blobs: DashMap::new(),
            base_url: base_url.into(),
            fail_writes: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
        }
    }

    /// Make subsequent writes fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent deletes fail.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.blobs.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn write(&self, key: &str, data: Bytes) -> AppResult<()> {
        let key = validate_key(key)?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::storage(format!("Failed to write blob: {key}")));
        }
        self.blobs.insert(key.to_string(), data);
        Ok(())
    }

    async fn read_bytes(&self, key: &str) -> AppResult<Bytes> {
        let key = validate_key(key)?;
        self.blobs
            .get(key)
            .map(|blob| blob.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {key}")))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let key = validate_key(key)?;
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::storage(format!("Failed to delete blob: {key}")));
        }
        self.blobs.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let key = validate_key(key)?;
        Ok(self.blobs.contains_key(key))
    }

    fn public_url(&self, key: &str) -> String {
        join_url(&self.base_url, key)
    }
}
