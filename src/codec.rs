//! Image decoding and same-format re-encoding.
//!
//! The pipeline never converts between formats: the output buffer is encoded
//! in whatever format the source bytes were sniffed as. Supported formats
//! match the enabled `image` crate features (JPEG, PNG, WebP, GIF).

use crate::error::PipelineError;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ColorType, DynamicImage, ImageEncoder as _, ImageFormat, RgbaImage};
use std::io::Cursor;

/// JPEG re-encode quality.
const JPEG_QUALITY: u8 = 90;

/// Decode image bytes, sniffing the format from the content.
pub fn decode(bytes: &[u8]) -> Result<(DynamicImage, ImageFormat), PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::decode("empty input buffer"));
    }

    let format = image::guess_format(bytes)
        .map_err(|e| PipelineError::decode(format!("unrecognized image data: {}", e)))?;
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| PipelineError::decode(e.to_string()))?;

    Ok((img, format))
}

/// Encode an RGBA image in the given format.
pub fn encode(image: &RgbaImage, format: ImageFormat) -> Result<Vec<u8>, PipelineError> {
    let mut out = Cursor::new(Vec::new());
    let (width, height) = (image.width(), image.height());

    match format {
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
                .write_image(rgb.as_raw(), width, height, ColorType::Rgb8)
                .map_err(|e| PipelineError::encode("jpeg", e.to_string()))?;
        }
        ImageFormat::Png => {
            PngEncoder::new(&mut out)
                .write_image(image.as_raw(), width, height, ColorType::Rgba8)
                .map_err(|e| PipelineError::encode("png", e.to_string()))?;
        }
        ImageFormat::WebP => {
            WebPEncoder::new_lossless(&mut out)
                .write_image(image.as_raw(), width, height, ColorType::Rgba8)
                .map_err(|e| PipelineError::encode("webp", e.to_string()))?;
        }
        ImageFormat::Gif => {
            let mut encoder = GifEncoder::new(&mut out);
            encoder
                .encode(image.as_raw(), width, height, ColorType::Rgba8)
                .map_err(|e| PipelineError::encode("gif", e.to_string()))?;
        }
        other => {
            return Err(PipelineError::encode(
                format!("{:?}", other).to_lowercase(),
                "no encoder for this format",
            ));
        }
    }

    Ok(out.into_inner())
}

/// Canonical MIME type for a sniffed format, used when the source object
/// carries no content-type.
pub fn content_type_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Png => "image/png",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Gif => "image/gif",
        _ => "application/octet-stream",
    }
}
