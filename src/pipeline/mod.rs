//! The watermarking pipeline.
//!
//! A strictly sequential four-stage pipeline, run once per object key:
//! fetch the raw object, render the watermark canvas, composite it onto the
//! decoded image, and store the re-encoded result under the same key. Each
//! stage is awaited before the next begins; the first error aborts the
//! invocation and nothing is written after a failed stage.

use crate::codec;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::storage::ObjectStore;
use crate::watermark::{composite_watermark, render_canvas_text, TextCanvasOptions};
use tracing::info;

/// Runs the fetch -> render -> composite -> store pipeline against an
/// object store. Holds no per-invocation state; safe to share across
/// concurrent invocations.
pub struct ImagePipeline<S> {
    store: S,
    config: PipelineConfig,
}

impl<S: ObjectStore> ImagePipeline<S> {
    pub fn new(store: S, config: PipelineConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process one object key end to end.
    ///
    /// The output is written to the destination bucket under the same key,
    /// in the source image's format, with the source's content-type.
    pub async fn process(&self, key: &str) -> Result<(), PipelineError> {
        let wm = &self.config.watermark;

        // Fetch
        let fetched = self
            .store
            .get_object(&self.config.source_bucket, key)
            .await?;
        info!(
            bucket = %self.config.source_bucket,
            key = %key,
            bytes = fetched.body.len(),
            "fetched source object"
        );

        // Render the watermark overlay
        let overlay = render_canvas_text(&TextCanvasOptions {
            text: wm.text.clone(),
            canvas_width: wm.canvas_width,
            canvas_height: wm.canvas_height,
            font_size: wm.font_size,
            opacity: wm.opacity,
        })?;

        // Composite onto the decoded image and re-encode in the same format
        let (base, format) = codec::decode(&fetched.body)?;
        let mut rgba = base.to_rgba8();
        composite_watermark(&mut rgba, &overlay, wm.anchor, wm.blend);
        let encoded = codec::encode(&rgba, format)?;

        let content_type = fetched
            .content_type
            .unwrap_or_else(|| codec::content_type_for(format).to_string());

        // Store
        self.store
            .put_object(&self.config.dest_bucket, key, encoded, &content_type)
            .await?;
        info!(
            bucket = %self.config.dest_bucket,
            key = %key,
            content_type = %content_type,
            width = rgba.width(),
            height = rgba.height(),
            "stored watermarked object"
        );

        Ok(())
    }
}
