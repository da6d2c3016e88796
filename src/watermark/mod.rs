//! Watermarks applied on top of the finished caption.
//!
//! Two kinds are supported and both may be present in one render:
//!
//! - **Image watermarks** are decoded from disk and centered on the canvas.
//! - **Text watermarks** are drawn three times on one baseline (center, left
//!   edge, right edge) with a configurable angle and opacity.
//!
//! The image watermark is always composited before the text watermark.

pub mod compositor;
pub mod position;

pub use compositor::{apply_image_watermark, apply_text_watermark, composite, TextWatermarkPlacement};
pub use position::{
    centered_position, fits_within, is_visible, text_anchor_position, CanvasDimensions,
    PlacementPosition, TextAnchor, WatermarkDimensions, TEXT_ANCHORS,
};
