//! Local-disk photo store.
//!
//! Writes objects under a configured root directory; the API server mounts
//! that directory at `/photos` via `ServeDir`, so the public URL is simply
//! the configured base plus the key.

use std::path::PathBuf;

use async_trait::async_trait;

use super::{PhotoStore, StoreError};

pub struct LocalPhotoStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalPhotoStore {
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The directory this store writes under (mounted by the server).
    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl PhotoStore for LocalPhotoStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, StoreError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes).await?;

        Ok(format!("{}/{key}", self.public_base_url))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.root.join(key)).await {
            Ok(()) => Ok(()),
            // Idempotent: a missing object is already deleted.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
