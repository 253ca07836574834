//! # keepsake-storage
//!
//! [`BlobStore`](keepsake_core::traits::BlobStore) implementations for
//! photo binaries.

pub mod key;
pub mod local;
pub mod memory;

use std::sync::Arc;

use keepsake_core::config::StorageConfig;
use keepsake_core::result::AppResult;
use keepsake_core::traits::BlobStore;

pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;

/// Open the local blob store described by the storage configuration.
pub async fn open_local(config: &StorageConfig) -> AppResult<Arc<dyn BlobStore>> {
    let store = LocalBlobStore::new(&config.root, &config.public_base_url).await?;
    Ok(Arc::new(store))
}
