//! Initial canvas construction.
//!
//! A render starts from exactly one background strategy:
//!
//! - **loaded**: decoded from a file, codec picked by extension
//! - **transparent**: every pixel fully transparent, alpha saved
//! - **bordered**: border color everywhere, background color inside the insets

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::{DynamicImage, ImageFormat};

use super::{allocate, Canvas, Color, ALPHA_OPAQUE, ALPHA_TRANSPARENT};
use crate::config::Border;
use crate::error::{RenderError, Result};

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillRect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl FillRect {
    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }
}

/// Decode `path` as PNG when its extension is `.png`, otherwise as JPEG.
///
/// The file content is never sniffed: a JPEG named `*.png` fails to decode.
pub fn decode_by_extension(path: &Path) -> Result<DynamicImage> {
    let format = codec_for_path(path);
    let file = File::open(path).map_err(|e| RenderError::decode(path, e))?;

    image::load(BufReader::new(file), format).map_err(|e| RenderError::decode(path, e))
}

/// `.png` in any letter case selects the PNG decoder, so `BG.PNG` decodes
/// as PNG. Every other extension, or none, selects JPEG.
fn codec_for_path(path: &Path) -> ImageFormat {
    let is_png = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("png"));

    if is_png {
        ImageFormat::Png
    } else {
        ImageFormat::Jpeg
    }
}

/// Build a canvas from a background image file.
pub fn create_from_file(path: &Path) -> Result<Canvas> {
    let image = decode_by_extension(path)?;
    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "Decoded background image"
    );
    Canvas::from_image(image)
}

/// Build a synthetic canvas, either fully transparent or bordered.
pub fn create_empty(
    width: u32,
    height: u32,
    border: &Border,
    background_color: Color,
    border_color: Color,
    transparent: bool,
) -> Result<Canvas> {
    let mut canvas = Canvas::new(width, height)?;

    if transparent {
        canvas.set_alpha_blending(false);
        let transparency = allocate(&canvas, Color::black(), ALPHA_TRANSPARENT);
        canvas.fill(&transparency);
        canvas.set_alpha_blending(true);
        canvas.set_save_alpha(true);
        return Ok(canvas);
    }

    let background = allocate(&canvas, background_color, ALPHA_OPAQUE);
    let outer = allocate(&canvas, border_color, ALPHA_OPAQUE);

    canvas.fill(&outer);

    let inner = inner_rect(width, height, border);
    if inner.is_empty() {
        tracing::debug!(
            width,
            height,
            ?border,
            "Border insets leave no room for background fill"
        );
    } else {
        canvas.fill_rect(inner, &background);
    }

    Ok(canvas)
}

/// Background rectangle left after insetting the canvas by `border`.
///
/// The far corner `(width - right, height - bottom)` is itself filled, so the
/// returned half-open rectangle ends one past it. Insets that cross over give
/// an empty rectangle.
pub fn inner_rect(width: u32, height: u32, border: &Border) -> FillRect {
    FillRect {
        x0: i64::from(border.left),
        y0: i64::from(border.top),
        x1: i64::from(width) - i64::from(border.right) + 1,
        y1: i64::from(height) - i64::from(border.bottom) + 1,
    }
}
