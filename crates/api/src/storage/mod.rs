//! Photo object storage.
//!
//! Project documents hold only `{url, storage_key}` references; the bytes
//! live behind the [`PhotoStore`] seam. Two backends exist: local disk
//! (development default, served via `ServeDir`) and S3.

pub mod local;
pub mod s3;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::PhotoStorageConfig;

pub use local::LocalPhotoStore;
pub use s3::S3PhotoStore;

/// Error type for object-store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Local filesystem failure.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote backend failure (S3).
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Abstraction over the external store holding photo binaries.
///
/// Keys are server-generated (`projects/{project_id}/{uuid}.{ext}`), so
/// implementations may treat them as safe relative paths.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Store an object and return its public URL.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<String, StoreError>;

    /// Delete an object by key. Deleting an absent object is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Build the configured photo store.
pub async fn from_config(config: &PhotoStorageConfig) -> Arc<dyn PhotoStore> {
    match config {
        PhotoStorageConfig::Local {
            root,
            public_base_url,
        } => Arc::new(LocalPhotoStore::new(root.clone(), public_base_url.clone())),
        PhotoStorageConfig::S3 {
            bucket,
            region,
            public_base_url,
        } => Arc::new(
            S3PhotoStore::connect(bucket.clone(), region.clone(), public_base_url.clone()).await,
        ),
    }
}
