use super::{ObjectPublisher, PublishError};
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::put_object::builders::PutObjectFluentBuilder;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use std::time::Duration;
use tracing::info;

/// S3 implementation of the ObjectPublisher trait
#[derive(Debug, Clone)]
pub struct S3Publisher {
    client: Client,
}

impl S3Publisher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Path-style addressing is needed for S3-compatible endpoints such as LocalStack
    pub fn from_sdk_config(config: &aws_config::SdkConfig, force_path_style: bool) -> Self {
        let s3_config = aws_sdk_s3::config::Builder::from(config)
            .force_path_style(force_path_style)
            .build();
        Self::new(Client::from_conf(s3_config))
    }
}

impl S3Publisher {
    /// Reports are private; only presigned links expose them
    fn put_request(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> PutObjectFluentBuilder {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .acl(ObjectCannedAcl::Private)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
    }
}

#[async_trait]
impl ObjectPublisher for S3Publisher {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, PublishError> {
        info!(bucket = %bucket, key = %key, bytes = bytes.len(), "Uploading object");

        self.put_request(bucket, key, bytes, content_type)
            .send()
            .await
            .map_err(|err| PublishError::Upload {
                key: key.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            })?;

        info!(bucket = %bucket, key = %key, "Uploaded object");
        Ok(key.to_string())
    }

    async fn presign(&self, bucket: &str, key: &str, ttl: Duration) -> Result<String, PublishError> {
        info!(bucket = %bucket, key = %key, ttl_secs = ttl.as_secs(), "Generating pre-signed URL");

        let presign_error = |message: String| PublishError::Presign {
            key: key.to_string(),
            message,
        };

        let config = PresigningConfig::expires_in(ttl).map_err(|err| presign_error(err.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(config)
            .await
            .map_err(|err| presign_error(DisplayErrorContext(&err).to_string()))?;

        Ok(request.uri().to_string())
    }
}
