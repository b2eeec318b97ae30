//! Anchor calculation for watermark placement.
//!
//! The watermark canvas is positioned against a fixed corner or edge of the
//! base image (its anchor, "gravity" in imaging tools). Coordinates may be
//! negative when the watermark is larger than the base image; the compositor
//! clips to the base bounds.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The corner or edge of the base image the watermark is placed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkAnchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    #[default]
    BottomRight,
}

impl FromStr for WatermarkAnchor {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top-left" => Ok(Self::TopLeft),
            "top-center" => Ok(Self::TopCenter),
            "top-right" => Ok(Self::TopRight),
            "center-left" => Ok(Self::CenterLeft),
            "center" => Ok(Self::Center),
            "center-right" => Ok(Self::CenterRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom-center" => Ok(Self::BottomCenter),
            "bottom-right" => Ok(Self::BottomRight),
            other => Err(PipelineError::Config(format!(
                "unknown watermark anchor '{}'",
                other
            ))),
        }
    }
}

/// Pixel coordinates of the watermark's top-left corner on the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
}

impl Placement {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Calculate where the watermark's top-left corner lands for an anchor.
///
/// The watermark sits flush against the anchored corner or edge.
pub fn calculate_placement(
    anchor: WatermarkAnchor,
    base_width: u32,
    base_height: u32,
    wm_width: u32,
    wm_height: u32,
) -> Placement {
    let bw = base_width as i32;
    let bh = base_height as i32;
    let ww = wm_width as i32;
    let wh = wm_height as i32;

    let left = 0;
    let center_x = (bw - ww) / 2;
    let right = bw - ww;

    let top = 0;
    let center_y = (bh - wh) / 2;
    let bottom = bh - wh;

    match anchor {
        WatermarkAnchor::TopLeft => Placement::new(left, top),
        WatermarkAnchor::TopCenter => Placement::new(center_x, top),
        WatermarkAnchor::TopRight => Placement::new(right, top),
        WatermarkAnchor::CenterLeft => Placement::new(left, center_y),
        WatermarkAnchor::Center => Placement::new(center_x, center_y),
        WatermarkAnchor::CenterRight => Placement::new(right, center_y),
        WatermarkAnchor::BottomLeft => Placement::new(left, bottom),
        WatermarkAnchor::BottomCenter => Placement::new(center_x, bottom),
        WatermarkAnchor::BottomRight => Placement::new(right, bottom),
    }
}
