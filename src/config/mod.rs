//! Pipeline configuration.
//!
//! Every knob has a compiled-in default matching the original deployment
//! (raw/processed buckets, the "mandalorian" watermark) and can be overridden
//! through environment variables at cold start. Invalid overrides fail the
//! process before the first invocation.

use crate::error::PipelineError;
use crate::watermark::{BlendMode, WatermarkAnchor};
use serde::{Deserialize, Serialize};

fn default_source_bucket() -> String {
    "rawimagestore".to_string()
}

fn default_dest_bucket() -> String {
    "processimagestore".to_string()
}

fn default_text() -> String {
    "mandalorian".to_string()
}

fn default_canvas_width() -> u32 {
    800
}

fn default_canvas_height() -> u32 {
    200
}

fn default_font_size() -> f32 {
    120.0
}

fn default_opacity() -> f32 {
    0.5
}

/// Watermark appearance and placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatermarkConfig {
    /// Watermark text (default: "mandalorian")
    #[serde(default = "default_text")]
    pub text: String,

    /// Overlay canvas width in pixels (default: 800)
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,

    /// Overlay canvas height in pixels (default: 200)
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,

    /// Font size in pixels (default: 120)
    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// Fill opacity, 0.0 to 1.0 (default: 0.5)
    #[serde(default = "default_opacity")]
    pub opacity: f32,

    /// Placement anchor (default: bottom-right)
    #[serde(default)]
    pub anchor: WatermarkAnchor,

    /// Blend mode (default: overlay)
    #[serde(default)]
    pub blend: BlendMode,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: default_text(),
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            font_size: default_font_size(),
            opacity: default_opacity(),
            anchor: WatermarkAnchor::default(),
            blend: BlendMode::default(),
        }
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Bucket that receives raw uploads and triggers the function
    #[serde(default = "default_source_bucket")]
    pub source_bucket: String,

    /// Bucket the watermarked output is written to
    #[serde(default = "default_dest_bucket")]
    pub dest_bucket: String,

    #[serde(default)]
    pub watermark: WatermarkConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_bucket: default_source_bucket(),
            dest_bucket: default_dest_bucket(),
            watermark: WatermarkConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load the configuration from process environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Result<Self, PipelineError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from a variable lookup. Factored out of
    /// `from_env` so tests can inject overrides without touching the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PipelineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("SOURCE_BUCKET") {
            config.source_bucket = v;
        }
        if let Some(v) = lookup("DEST_BUCKET") {
            config.dest_bucket = v;
        }
        if let Some(v) = lookup("WATERMARK_TEXT") {
            config.watermark.text = v;
        }
        if let Some(v) = lookup("WATERMARK_CANVAS") {
            let (w, h) = parse_canvas(&v)?;
            config.watermark.canvas_width = w;
            config.watermark.canvas_height = h;
        }
        if let Some(v) = lookup("WATERMARK_FONT_SIZE") {
            config.watermark.font_size = v.parse::<f32>().map_err(|_| {
                PipelineError::Config(format!("invalid WATERMARK_FONT_SIZE '{}'", v))
            })?;
        }
        if let Some(v) = lookup("WATERMARK_OPACITY") {
            config.watermark.opacity = v
                .parse::<f32>()
                .map_err(|_| PipelineError::Config(format!("invalid WATERMARK_OPACITY '{}'", v)))?;
        }
        if let Some(v) = lookup("WATERMARK_ANCHOR") {
            config.watermark.anchor = v.parse()?;
        }
        if let Some(v) = lookup("WATERMARK_BLEND") {
            config.watermark.blend = v.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline cannot execute.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.source_bucket.is_empty() {
            return Err(PipelineError::Config(
                "source bucket cannot be empty".to_string(),
            ));
        }
        if self.dest_bucket.is_empty() {
            return Err(PipelineError::Config(
                "destination bucket cannot be empty".to_string(),
            ));
        }
        if self.watermark.text.is_empty() {
            return Err(PipelineError::Config(
                "watermark text cannot be empty".to_string(),
            ));
        }
        if self.watermark.canvas_width == 0 || self.watermark.canvas_height == 0 {
            return Err(PipelineError::Config(format!(
                "watermark canvas {}x{} must be non-zero",
                self.watermark.canvas_width, self.watermark.canvas_height
            )));
        }
        if !self.watermark.font_size.is_finite() || self.watermark.font_size <= 0.0 {
            return Err(PipelineError::Config(format!(
                "font size {} must be positive",
                self.watermark.font_size
            )));
        }
        if !(0.0..=1.0).contains(&self.watermark.opacity) {
            return Err(PipelineError::Config(format!(
                "opacity {} must be between 0.0 and 1.0",
                self.watermark.opacity
            )));
        }
        Ok(())
    }
}

/// Parse a `WIDTHxHEIGHT` canvas spec, e.g. `800x200`.
fn parse_canvas(spec: &str) -> Result<(u32, u32), PipelineError> {
    let invalid = || PipelineError::Config(format!("invalid WATERMARK_CANVAS '{}'", spec));
    let (w, h) = spec.split_once('x').ok_or_else(invalid)?;
    let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = h.trim().parse::<u32>().map_err(|_| invalid())?;
    Ok((width, height))
}
