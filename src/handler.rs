//! Lambda invocation controller.
//!
//! Parses the S3 notification event, runs the pipeline once per record, and
//! maps the outcome to the function result. Every record in the event is
//! processed in order; the first failure is logged and returned to the
//! runtime unchanged, which then applies its own retry or dead-letter
//! policy.

use crate::pipeline::ImagePipeline;
use crate::storage::ObjectStore;
use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{Error, LambdaEvent};
use serde::Serialize;
use tracing::{error, info, warn};

/// Structured success result returned to the invoking environment.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    fn ok() -> Self {
        Self {
            status_code: 200,
            body: "Watermark added successfully.".to_string(),
        }
    }
}

/// Handle one S3 notification event.
pub async fn function_handler<S: ObjectStore>(
    event: LambdaEvent<S3Event>,
    pipeline: &ImagePipeline<S>,
) -> Result<HandlerResponse, Error> {
    let keys = object_keys(&event.payload);
    if keys.is_empty() {
        warn!("event contained no object records, nothing to process");
        return Ok(HandlerResponse::ok());
    }

    info!(records = keys.len(), "processing notification event");
    for key in &keys {
        if let Err(err) = pipeline.process(key).await {
            error!(error = %err, key = %key, "error processing image");
            return Err(err.into());
        }
    }

    Ok(HandlerResponse::ok())
}

/// Extract and decode the object keys from every record in the event.
///
/// S3 notification keys arrive URL-encoded with spaces as `+`.
fn object_keys(event: &S3Event) -> Vec<String> {
    event
        .records
        .iter()
        .filter_map(|record| record.s3.object.key.as_deref())
        .map(decode_key)
        .collect()
}

fn decode_key(raw: &str) -> String {
    let unplussed = raw.replace('+', " ");
    match urlencoding::decode(&unplussed) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => unplussed,
    }
}
