//! Text watermark rendering.
//!
//! Rasterizes the watermark text onto a transparent canvas of fixed size,
//! centered horizontally and vertically, with a semi-transparent white fill.
//! The output is deterministic: the same options always produce the same
//! pixels.

use crate::error::PipelineError;
use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::sync::OnceLock;

/// Embedded bold sans-serif font (DejaVu Sans Bold, Bitstream Vera license).
const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSans-Bold.ttf");

static DEFAULT_FONT: OnceLock<FontRef<'static>> = OnceLock::new();

fn default_font() -> Result<&'static FontRef<'static>, PipelineError> {
    if let Some(font) = DEFAULT_FONT.get() {
        return Ok(font);
    }
    let font = FontRef::try_from_slice(EMBEDDED_FONT_DATA)
        .map_err(|e| PipelineError::Render(format!("embedded font failed to load: {}", e)))?;
    Ok(DEFAULT_FONT.get_or_init(|| font))
}

/// Options for rendering the watermark canvas.
#[derive(Debug, Clone)]
pub struct TextCanvasOptions {
    /// The watermark text.
    pub text: String,
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Font size in pixels.
    pub font_size: f32,
    /// Fill opacity (0.0 to 1.0).
    pub opacity: f32,
}

/// Measure the advance width of the text at the given font size.
fn measure_width<F: Font>(font: &F, scale: PxScale, text: &str) -> f32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(p) = prev {
            width += scaled.kern(p, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }

    width
}

/// Render the watermark text centered on a transparent canvas.
///
/// Text wider than the canvas is clipped at the canvas edges, matching the
/// fixed-canvas contract of the watermark overlay.
pub fn render_canvas_text(options: &TextCanvasOptions) -> Result<RgbaImage, PipelineError> {
    if options.text.is_empty() {
        return Err(PipelineError::Render("cannot render empty text".to_string()));
    }
    if options.canvas_width == 0 || options.canvas_height == 0 {
        return Err(PipelineError::Render(format!(
            "invalid canvas size {}x{}",
            options.canvas_width, options.canvas_height
        )));
    }

    let font = default_font()?;
    let scale = PxScale::from(options.font_size);
    let scaled = font.as_scaled(scale);

    let mut canvas = RgbaImage::new(options.canvas_width, options.canvas_height);
    let fill_alpha = (options.opacity.clamp(0.0, 1.0) * 255.0) as u8;

    // Center the text block: horizontal by advance width, vertical by the
    // font's ascent/descent box
    let text_width = measure_width(font, scale, &options.text);
    let text_height = scaled.ascent() - scaled.descent();
    let mut cursor_x = (options.canvas_width as f32 - text_width) / 2.0;
    let baseline_y = (options.canvas_height as f32 - text_height) / 2.0 + scaled.ascent();

    let mut prev: Option<ab_glyph::GlyphId> = None;
    for c in options.text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(p) = prev {
            cursor_x += scaled.kern(p, id);
        }

        let glyph = id.with_scale_and_position(scale, ab_glyph::point(cursor_x, baseline_y));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;
                if x >= 0
                    && y >= 0
                    && x < options.canvas_width as i32
                    && y < options.canvas_height as i32
                {
                    let alpha = (coverage * fill_alpha as f32) as u8;
                    let existing = canvas.get_pixel(x as u32, y as u32);
                    // Keep the strongest coverage where outlines touch the
                    // same pixel (anti-aliased edges)
                    if alpha > existing[3] {
                        canvas.put_pixel(x as u32, y as u32, Rgba([255, 255, 255, alpha]));
                    }
                }
            });
        }

        cursor_x += scaled.h_advance(id);
        prev = Some(id);
    }

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> TextCanvasOptions {
        TextCanvasOptions {
            text: "mandalorian".to_string(),
            canvas_width: 800,
            canvas_height: 200,
            font_size: 120.0,
            opacity: 0.5,
        }
    }

    #[test]
    fn test_canvas_has_configured_dimensions() {
        let canvas = render_canvas_text(&options()).unwrap();
        assert_eq!(canvas.width(), 800);
        assert_eq!(canvas.height(), 200);
    }

    #[test]
    fn test_rendered_text_has_visible_pixels() {
        let canvas = render_canvas_text(&options()).unwrap();
        let visible = canvas.pixels().filter(|p| p[3] > 0).count();
        assert!(visible > 0, "rendered text should have visible pixels");
    }

    #[test]
    fn test_fill_is_white_at_half_opacity() {
        let canvas = render_canvas_text(&options()).unwrap();
        let max_alpha = canvas.pixels().map(|p| p[3]).max().unwrap();
        // Full-coverage glyph interiors carry the configured 50% alpha
        assert!(max_alpha >= 120 && max_alpha <= 128, "max alpha {}", max_alpha);
        for p in canvas.pixels().filter(|p| p[3] > 0) {
            assert_eq!((p[0], p[1], p[2]), (255, 255, 255));
        }
    }

    #[test]
    fn test_text_is_roughly_centered() {
        let canvas = render_canvas_text(&options()).unwrap();

        let mut min_x = u32::MAX;
        let mut max_x = 0u32;
        let mut min_y = u32::MAX;
        let mut max_y = 0u32;
        for (x, y, p) in canvas.enumerate_pixels() {
            if p[3] > 0 {
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }

        let left_gap = min_x as i64;
        let right_gap = 800 - 1 - max_x as i64;
        let top_gap = min_y as i64;
        let bottom_gap = 200 - 1 - max_y as i64;
        assert!((left_gap - right_gap).abs() < 20, "{} vs {}", left_gap, right_gap);
        assert!((top_gap - bottom_gap).abs() < 40, "{} vs {}", top_gap, bottom_gap);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let a = render_canvas_text(&options()).unwrap();
        let b = render_canvas_text(&options()).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_opacity_scales_alpha() {
        let mut faint = options();
        faint.opacity = 0.25;
        let half = render_canvas_text(&options()).unwrap();
        let quarter = render_canvas_text(&faint).unwrap();

        let max_half = half.pixels().map(|p| p[3]).max().unwrap();
        let max_quarter = quarter.pixels().map(|p| p[3]).max().unwrap();
        assert!(max_quarter < max_half);
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let mut opts = options();
        opts.text = String::new();
        assert!(render_canvas_text(&opts).is_err());
    }

    #[test]
    fn test_zero_canvas_is_rejected() {
        let mut opts = options();
        opts.canvas_width = 0;
        assert!(render_canvas_text(&opts).is_err());
    }
}
