//! S3-backed photo store.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

use super::{PhotoStore, StoreError};

pub struct S3PhotoStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3PhotoStore {
    /// Build a client from the ambient AWS credential chain.
    ///
    /// When `public_base_url` is not given, URLs use the standard
    /// virtual-hosted bucket form for the region.
    pub async fn connect(bucket: String, region: String, public_base_url: Option<String>) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.clone()))
            .load()
            .await;
        let client = aws_sdk_s3::Client::new(&sdk_config);

        let public_base_url = public_base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("https://{bucket}.s3.{region}.amazonaws.com"));

        Self {
            client,
            bucket,
            public_base_url,
        }
    }
}

#[async_trait]
impl PhotoStore for S3PhotoStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(format!("{}/{key}", self.public_base_url))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        // S3 DeleteObject succeeds for absent keys, matching the trait's
        // idempotency contract.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}
