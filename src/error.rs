//! Error types for the watermarking pipeline.
//!
//! Every error is terminal for the invocation: the handler logs it with
//! context and returns it to the Lambda runtime unchanged. There is no
//! internal retry; the invoking environment owns retry and dead-letter
//! policy.

use thiserror::Error;

/// Errors that can occur while processing a single object.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Source object missing or source store inaccessible
    #[error("failed to retrieve s3://{bucket}/{key}: {message}")]
    Retrieval {
        bucket: String,
        key: String,
        message: String,
    },

    /// Fetched bytes are not a decodable image
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// Re-encoding the composited image to the original format failed
    #[error("failed to encode image as {format}: {message}")]
    Encode { format: String, message: String },

    /// Destination store rejected the write
    #[error("failed to store s3://{bucket}/{key}: {message}")]
    Persist {
        bucket: String,
        key: String,
        message: String,
    },

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// Watermark text rasterization failed
    #[error("failed to render watermark text: {0}")]
    Render(String),
}

impl PipelineError {
    pub fn retrieval(
        bucket: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        PipelineError::Retrieval {
            bucket: bucket.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        PipelineError::Decode(message.into())
    }

    pub fn encode(format: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::Encode {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn persist(
        bucket: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        PipelineError::Persist {
            bucket: bucket.into(),
            key: key.into(),
            message: message.into(),
        }
    }
}
