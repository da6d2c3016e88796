//! Position calculation for watermark placement.
//!
//! # Placement rules
//!
//! - **Image watermarks** are centered using the absolute size difference,
//!   so a watermark larger than the canvas is pushed right/down rather than
//!   clamped, and may end up partly or fully outside the canvas.
//! - **Text watermarks** share one vertical position and are repeated at three
//!   horizontal anchors: centered, left edge and right edge.
//!
//! # Example
//!
//! ```
//! use textimage::watermark::position::{centered_position, CanvasDimensions, WatermarkDimensions};
//!
//! let canvas = CanvasDimensions { width: 800, height: 600 };
//! let watermark = WatermarkDimensions { width: 100, height: 50 };
//!
//! let pos = centered_position(&canvas, &watermark);
//! assert_eq!((pos.x, pos.y), (350, 275));
//! ```

/// Dimensions of the target canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasDimensions {
    pub width: u32,
    pub height: u32,
}

/// Dimensions of the watermark to be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkDimensions {
    pub width: u32,
    pub height: u32,
}

/// Top-left corner (image) or baseline origin (text) of one placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Horizontal anchor of one watermark text copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Center,
    Left,
    Right,
}

/// Draw order of the watermark text copies.
pub const TEXT_ANCHORS: [TextAnchor; 3] = [TextAnchor::Center, TextAnchor::Left, TextAnchor::Right];

fn abs_diff(a: u32, b: u32) -> i64 {
    (i64::from(a) - i64::from(b)).abs()
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Offset that centers `watermark` on `canvas`.
///
/// Uses `|canvas - watermark| / 2` on each axis, with integer division.
pub fn centered_position(
    canvas: &CanvasDimensions,
    watermark: &WatermarkDimensions,
) -> PlacementPosition {
    PlacementPosition::new(
        saturate(abs_diff(canvas.width, watermark.width) / 2),
        saturate(abs_diff(canvas.height, watermark.height) / 2),
    )
}

/// Baseline origin of a watermark text copy measuring `text_width` x
/// `text_height`.
pub fn text_anchor_position(
    anchor: TextAnchor,
    canvas: &CanvasDimensions,
    text_width: u32,
    text_height: u32,
) -> PlacementPosition {
    let y = (i64::from(canvas.height) - i64::from(text_height)) / 2;
    let gap = abs_diff(canvas.width, text_width);

    let x = match anchor {
        TextAnchor::Center => gap / 2,
        TextAnchor::Left => 0,
        TextAnchor::Right => gap,
    };

    PlacementPosition::new(saturate(x), saturate(y))
}

/// Whether any part of the watermark lands on the canvas.
pub fn is_visible(
    position: &PlacementPosition,
    watermark: &WatermarkDimensions,
    canvas: &CanvasDimensions,
) -> bool {
    let x = i64::from(position.x);
    let y = i64::from(position.y);

    x < i64::from(canvas.width)
        && y < i64::from(canvas.height)
        && x + i64::from(watermark.width) > 0
        && y + i64::from(watermark.height) > 0
}

/// Whether the watermark lies entirely on the canvas.
pub fn fits_within(
    position: &PlacementPosition,
    watermark: &WatermarkDimensions,
    canvas: &CanvasDimensions,
) -> bool {
    let x = i64::from(position.x);
    let y = i64::from(position.y);

    x >= 0
        && y >= 0
        && x + i64::from(watermark.width) <= i64::from(canvas.width)
        && y + i64::from(watermark.height) <= i64::from(canvas.height)
}
