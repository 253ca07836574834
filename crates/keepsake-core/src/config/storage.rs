//! Photo blob storage configuration.

use serde::{Deserialize, Serialize};

/// Where uploaded photo binaries are written and how they are addressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the local blob store.
    #[serde(default = "default_root")]
    pub root: String,
    /// Base URL prefixed to a storage key to form its public URL.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Largest accepted upload in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            public_base_url: default_public_base_url(),
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_root() -> String {
    "./data/photos".to_string()
}

fn default_public_base_url() -> String {
    "file://./data/photos".to_string()
}

fn default_max_upload() -> u64 {
    25 * 1024 * 1024
}
