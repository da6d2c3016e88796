//! Watermark compositing onto a canvas.
//!
//! # Image watermarks
//!
//! The watermark file is decoded with the same by-extension rule as
//! backgrounds, converted to an alpha-preserving RGBA copy, centered and
//! blended pixel by pixel. Its own alpha channel governs the blend.
//!
//! # Text watermarks
//!
//! Opacity in `[0, 1]` becomes alpha units, the text is measured at the given
//! size and angle, and three copies are drawn on one shared baseline: centered,
//! left-anchored and right-anchored.

use std::path::Path;

use image::{Rgba, RgbaImage};

use super::position::{
    centered_position, fits_within, is_visible, text_anchor_position, CanvasDimensions,
    PlacementPosition, TextAnchor, WatermarkDimensions, TEXT_ANCHORS,
};
use crate::canvas::{
    allocate, alpha_units_to_alpha8, decode_by_extension, opacity_to_alpha_units, Canvas,
};
use crate::error::Result;
use crate::text::TextStyle;

/// Where the text watermark copies were drawn, and with which alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextWatermarkPlacement {
    pub alpha_units: u8,
    pub text_width: u32,
    pub text_height: u32,
    pub copies: [(TextAnchor, PlacementPosition); 3],
}

fn dimensions_of(canvas: &Canvas) -> CanvasDimensions {
    CanvasDimensions {
        width: canvas.width(),
        height: canvas.height(),
    }
}

/// Decode the watermark at `path` and blend it centered onto `canvas`.
///
/// `alpha_units` fades the whole watermark on top of its own alpha channel
/// (0 = as-is, 127 = invisible). Returns the top-left corner used.
pub fn apply_image_watermark(
    canvas: &mut Canvas,
    path: &Path,
    alpha_units: u8,
) -> Result<PlacementPosition> {
    let watermark = decode_by_extension(path)?.into_rgba8();

    let wm_dims = WatermarkDimensions {
        width: watermark.width(),
        height: watermark.height(),
    };
    let canvas_dims = dimensions_of(canvas);
    let position = centered_position(&canvas_dims, &wm_dims);

    if !fits_within(&position, &wm_dims, &canvas_dims) {
        tracing::debug!(
            path = %path.display(),
            x = position.x,
            y = position.y,
            visible = is_visible(&position, &wm_dims, &canvas_dims),
            "Watermark image extends past canvas"
        );
    }

    let opacity = f32::from(alpha_units_to_alpha8(alpha_units)) / 255.0;
    composite(canvas, &watermark, position, opacity);

    Ok(position)
}

/// Blend `watermark` onto `canvas` with its top-left corner at `position`.
///
/// `opacity` (0.0 to 1.0) multiplies the watermark's alpha. Parts outside the
/// canvas are clipped.
pub fn composite(
    canvas: &mut Canvas,
    watermark: &RgbaImage,
    position: PlacementPosition,
    opacity: f32,
) {
    let opacity = opacity.clamp(0.0, 1.0);
    let target_width = i64::from(canvas.width());
    let target_height = i64::from(canvas.height());

    let (px, py) = (i64::from(position.x), i64::from(position.y));

    // Calculate the visible region (clamp to target bounds)
    let x_start = px.max(0);
    let y_start = py.max(0);
    let x_end = (px + i64::from(watermark.width())).min(target_width);
    let y_end = (py + i64::from(watermark.height())).min(target_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let wm_pixel = watermark.get_pixel((tx - px) as u32, (ty - py) as u32);
            let alpha = (f32::from(wm_pixel[3]) * opacity).round() as u8;
            canvas.put_pixel(tx, ty, Rgba([wm_pixel[0], wm_pixel[1], wm_pixel[2], alpha]));
        }
    }
}

/// Draw `text` three times across `canvas` at `opacity` (1.0 = opaque).
pub fn apply_text_watermark(
    canvas: &mut Canvas,
    text: &str,
    style: &TextStyle<'_>,
    angle: f32,
    opacity: f32,
) -> Result<TextWatermarkPlacement> {
    let alpha_units = opacity_to_alpha_units(opacity);
    let color = allocate(canvas, style.color, alpha_units);

    let bounds = style.font.measure(text, style.size, angle);
    let text_width = bounds.width().round() as u32;
    let text_height = bounds.height().round() as u32;
    let canvas_dims = dimensions_of(canvas);

    let copies = TEXT_ANCHORS
        .map(|anchor| (anchor, text_anchor_position(anchor, &canvas_dims, text_width, text_height)));

    for (anchor, position) in &copies {
        style
            .font
            .draw(canvas, text, style.size, angle, position.x, position.y, &color)?;
        tracing::trace!(?anchor, x = position.x, y = position.y, "Drew watermark text");
    }

    Ok(TextWatermarkPlacement {
        alpha_units,
        text_width,
        text_height,
        copies,
    })
}
