//! Object storage access.
//!
//! The pipeline talks to storage through the `ObjectStore` trait so tests
//! can substitute in-memory or mock stores. The production implementation
//! wraps the shared `aws-sdk-s3` client, which is constructed once per
//! process at cold start and reused read-only across invocations.

use crate::error::PipelineError;
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

/// A fetched object: its full body plus declared content-type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedObject {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

/// Blob store operations the pipeline needs: one read, one write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's full content and content-type.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<FetchedObject, PipelineError>;

    /// Persist a buffer under the given key, overwriting any existing object.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PipelineError>;
}

/// `ObjectStore` backed by AWS S3.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: S3Client,
}

impl S3ObjectStore {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<FetchedObject, PipelineError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                PipelineError::retrieval(bucket, key, format!("{}", DisplayErrorContext(&e)))
            })?;

        let content_type = output.content_type().map(str::to_string);
        let body = output
            .body
            .collect()
            .await
            .map_err(|e| PipelineError::retrieval(bucket, key, e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(FetchedObject { body, content_type })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PipelineError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                PipelineError::persist(bucket, key, format!("{}", DisplayErrorContext(&e)))
            })?;

        Ok(())
    }
}
