//! Watermark rendering and compositing.
//!
//! The watermark is a fixed text overlay rasterized onto a transparent
//! canvas (`text_renderer`), positioned against an anchor of the base image
//! (`position`), and blended in with a configurable blend mode
//! (`compositor`). All three stages are pure pixel operations with no I/O.

pub mod compositor;
pub mod position;
pub mod text_renderer;

pub use compositor::{composite_watermark, BlendMode};
pub use position::{calculate_placement, Placement, WatermarkAnchor};
pub use text_renderer::{render_canvas_text, TextCanvasOptions};
