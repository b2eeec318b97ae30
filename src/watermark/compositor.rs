//! Watermark compositor.
//!
//! Blends the rendered watermark canvas onto the base image at a calculated
//! placement. The default blend mode is "overlay": the result darkens or
//! lightens depending on the base channel relative to mid-gray, rather than
//! plain alpha transparency. The watermark is clipped to the base image's
//! bounds, so a base smaller than the canvas is still valid.

use super::position::{calculate_placement, Placement, WatermarkAnchor};
use crate::error::PipelineError;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How watermark pixels are combined with the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Contrast blend: channels below mid-gray are darkened, above are
    /// lightened, weighted by the watermark's alpha
    #[default]
    Overlay,
    /// Porter-Duff "over" alpha compositing
    Over,
}

impl FromStr for BlendMode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overlay" => Ok(Self::Overlay),
            "over" => Ok(Self::Over),
            other => Err(PipelineError::Config(format!(
                "unknown blend mode '{}'",
                other
            ))),
        }
    }
}

/// Composite the watermark onto the base image at the given anchor.
///
/// Regions of the watermark falling outside the base are discarded.
pub fn composite_watermark(
    base: &mut RgbaImage,
    watermark: &RgbaImage,
    anchor: WatermarkAnchor,
    blend: BlendMode,
) {
    let placement = calculate_placement(
        anchor,
        base.width(),
        base.height(),
        watermark.width(),
        watermark.height(),
    );
    blend_at(base, watermark, placement, blend);
}

/// Blend the watermark onto the base at an explicit placement.
fn blend_at(base: &mut RgbaImage, watermark: &RgbaImage, placement: Placement, blend: BlendMode) {
    let base_w = base.width() as i32;
    let base_h = base.height() as i32;
    let wm_w = watermark.width() as i32;
    let wm_h = watermark.height() as i32;

    // Visible region, clipped to the base bounds
    let x_start = placement.x.max(0);
    let y_start = placement.y.max(0);
    let x_end = (placement.x + wm_w).min(base_w);
    let y_end = (placement.y + wm_h).min(base_h);

    for by in y_start..y_end {
        for bx in x_start..x_end {
            let wx = (bx - placement.x) as u32;
            let wy = (by - placement.y) as u32;

            let wm_pixel = *watermark.get_pixel(wx, wy);
            if wm_pixel[3] == 0 {
                continue;
            }
            let base_pixel = *base.get_pixel(bx as u32, by as u32);

            let blended = match blend {
                BlendMode::Overlay => blend_overlay(base_pixel, wm_pixel),
                BlendMode::Over => blend_over(base_pixel, wm_pixel),
            };
            base.put_pixel(bx as u32, by as u32, blended);
        }
    }
}

/// Overlay blend: 2*b*f below mid-gray, 1 - 2*(1-b)*(1-f) above, mixed into
/// the base by the watermark's alpha.
fn blend_overlay(base: Rgba<u8>, wm: Rgba<u8>) -> Rgba<u8> {
    let wm_alpha = wm[3] as f32 / 255.0;
    let base_alpha = base[3] as f32 / 255.0;
    let out_alpha = wm_alpha + base_alpha * (1.0 - wm_alpha);

    let channel = |b: u8, f: u8| -> u8 {
        let b = b as f32 / 255.0;
        let f = f as f32 / 255.0;
        let overlaid = if b <= 0.5 {
            2.0 * b * f
        } else {
            1.0 - 2.0 * (1.0 - b) * (1.0 - f)
        };
        let result = b + (overlaid - b) * wm_alpha;
        (result * 255.0).clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(base[0], wm[0]),
        channel(base[1], wm[1]),
        channel(base[2], wm[2]),
        (out_alpha * 255.0).clamp(0.0, 255.0) as u8,
    ])
}

/// Porter-Duff "over": foreground + background * (1 - foreground.alpha).
fn blend_over(base: Rgba<u8>, wm: Rgba<u8>) -> Rgba<u8> {
    let wm_alpha = wm[3] as f32 / 255.0;
    let base_alpha = base[3] as f32 / 255.0;
    let out_alpha = wm_alpha + base_alpha * (1.0 - wm_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |f: u8, b: u8| -> u8 {
        let f = f as f32 / 255.0;
        let b = b as f32 / 255.0;
        let result = (f * wm_alpha + b * base_alpha * (1.0 - wm_alpha)) / out_alpha;
        (result * 255.0).clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(wm[0], base[0]),
        channel(wm[1], base[1]),
        channel(wm[2], base[2]),
        (out_alpha * 255.0).clamp(0.0, 255.0) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(width, height, color)
    }

    #[test]
    fn test_overlay_lightens_dark_base_under_white() {
        // Base below mid-gray with a half-alpha white watermark: overlay
        // gives 2*b*1 = 2b, mixed at 50% -> 1.5x the base value
        let base = blend_overlay(Rgba([100, 100, 100, 255]), Rgba([255, 255, 255, 128]));
        for c in 0..3 {
            assert!(base[c] > 140 && base[c] < 160, "channel {} = {}", c, base[c]);
        }
        assert_eq!(base[3], 255);
    }

    #[test]
    fn test_overlay_leaves_black_black() {
        // 2 * 0 * f = 0: overlay cannot lighten pure black
        let out = blend_overlay(Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 128]));
        assert_eq!((out[0], out[1], out[2]), (0, 0, 0));
    }

    #[test]
    fn test_overlay_leaves_white_white() {
        // 1 - 2*(1-1)*(1-f) = 1: overlay cannot darken pure white
        let out = blend_overlay(Rgba([255, 255, 255, 255]), Rgba([255, 255, 255, 128]));
        assert_eq!((out[0], out[1], out[2]), (255, 255, 255));
    }

    #[test]
    fn test_overlay_with_zero_alpha_is_identity() {
        let out = blend_overlay(Rgba([42, 84, 126, 255]), Rgba([255, 255, 255, 0]));
        assert_eq!(out, Rgba([42, 84, 126, 255]));
    }

    #[test]
    fn test_over_blend_half_white_on_black_is_gray() {
        let out = blend_over(Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 128]));
        for c in 0..3 {
            assert!(out[c] > 100 && out[c] < 160, "channel {} = {}", c, out[c]);
        }
        assert_eq!(out[3], 255);
    }

    #[test]
    fn test_composite_at_bottom_right() {
        let mut base = solid(100, 100, Rgba([100, 100, 100, 255]));
        let wm = solid(20, 20, Rgba([255, 255, 255, 128]));

        composite_watermark(&mut base, &wm, WatermarkAnchor::BottomRight, BlendMode::Overlay);

        // Inside the watermark region the base is lightened
        let inside = base.get_pixel(90, 90);
        assert!(inside[0] > 100);

        // Outside the region the base is untouched
        let outside = base.get_pixel(10, 10);
        assert_eq!(*outside, Rgba([100, 100, 100, 255]));
    }

    #[test]
    fn test_composite_clips_oversized_watermark() {
        // 50x50 base, 800x200 watermark: only the overlapping region blends
        let mut base = solid(50, 50, Rgba([100, 100, 100, 255]));
        let wm = solid(800, 200, Rgba([255, 255, 255, 128]));

        composite_watermark(&mut base, &wm, WatermarkAnchor::BottomRight, BlendMode::Overlay);

        assert_eq!(base.width(), 50);
        assert_eq!(base.height(), 50);
        // Whole base is covered by the clipped watermark
        let p = base.get_pixel(0, 0);
        assert!(p[0] > 100);
    }

    #[test]
    fn test_composite_does_not_resize_base() {
        let mut base = solid(333, 77, Rgba([60, 60, 60, 255]));
        let wm = solid(800, 200, Rgba([255, 255, 255, 128]));
        composite_watermark(&mut base, &wm, WatermarkAnchor::BottomRight, BlendMode::Overlay);
        assert_eq!((base.width(), base.height()), (333, 77));
    }

    #[test]
    fn test_transparent_watermark_is_noop() {
        let mut base = solid(100, 100, Rgba([200, 10, 10, 255]));
        let wm = solid(20, 20, Rgba([0, 255, 0, 0]));
        composite_watermark(&mut base, &wm, WatermarkAnchor::Center, BlendMode::Overlay);
        assert_eq!(*base.get_pixel(50, 50), Rgba([200, 10, 10, 255]));
    }

    #[test]
    fn test_blend_mode_parsing() {
        assert_eq!("overlay".parse::<BlendMode>().unwrap(), BlendMode::Overlay);
        assert_eq!("over".parse::<BlendMode>().unwrap(), BlendMode::Over);
        assert!("multiply".parse::<BlendMode>().is_err());
    }

    #[test]
    fn test_default_blend_mode_is_overlay() {
        assert_eq!(BlendMode::default(), BlendMode::Overlay);
    }
}
