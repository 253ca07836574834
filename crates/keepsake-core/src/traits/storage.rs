//! Blob storage trait for photo binaries.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for the binary image store.
///
/// Keys are relative, slash-separated paths such as
/// `"{album_id}/{millis}_{suffix}.jpg"`. Implementations live in
/// `keepsake-storage`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write bytes under the given key, replacing any existing blob.
    async fn write(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Read a blob into memory.
    async fn read_bytes(&self, key: &str) -> AppResult<Bytes>;

    /// Delete the blob stored under the key.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a blob exists under the key.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Public URL under which the blob can be fetched.
    fn public_url(&self, key: &str) -> String;
}
