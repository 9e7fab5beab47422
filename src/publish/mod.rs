pub mod s3;

pub use s3::S3Publisher;

use async_trait::async_trait;
use std::time::Duration;

/// Object storage that can hand out time-limited download links
#[async_trait]
pub trait ObjectPublisher: Send + Sync {
    /// Store `bytes` under `key`, returning the key
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, PublishError>;

    /// Presigned GET URL for `key`, valid for `ttl`
    async fn presign(&self, bucket: &str, key: &str, ttl: Duration) -> Result<String, PublishError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("upload of {key} failed: {message}")]
    Upload { key: String, message: String },

    #[error("presigning {key} failed: {message}")]
    Presign { key: String, message: String },
}
