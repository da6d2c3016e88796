//! In-memory raster surface that every render step draws on.
//!
//! A [`Canvas`] is owned by exactly one render call. Its dimensions are fixed
//! at creation. Two flags mirror the classic true-color raster model:
//!
//! - `alpha_blending`: when on, drawing composites with the "over" operator;
//!   when off, drawn pixels (alpha included) replace what is underneath.
//! - `save_alpha`: whether encoders keep the alpha channel in the output.

pub mod color;
pub mod factory;

pub use color::{
    allocate, alpha_units_to_alpha8, opacity_to_alpha_units, parse_hex_color, Color, ColorHandle,
    ALPHA_OPAQUE, ALPHA_TRANSPARENT,
};
pub use factory::{create_empty, create_from_file, decode_by_extension, inner_rect, FillRect};

use std::sync::atomic::{AtomicU64, Ordering};

use image::{DynamicImage, Rgba, RgbaImage};

use crate::error::{RenderError, Result};

/// Largest canvas accepted, in pixels (100 megapixels).
pub const MAX_CANVAS_PIXELS: u64 = 100_000_000;

static NEXT_CANVAS_ID: AtomicU64 = AtomicU64::new(1);

/// A true-color raster surface with an alpha channel.
pub struct Canvas {
    id: u64,
    pixels: RgbaImage,
    alpha_blending: bool,
    save_alpha: bool,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("id", &self.id)
            .field("dimensions", &self.pixels.dimensions())
            .field("alpha_blending", &self.alpha_blending)
            .field("save_alpha", &self.save_alpha)
            .finish()
    }
}

impl Canvas {
    /// Allocate an opaque black canvas with blending on and alpha saving off.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self::wrap(RgbaImage::from_pixel(
            width,
            height,
            Rgba([0, 0, 0, 255]),
        )))
    }

    /// Wrap a decoded image. The alpha channel is kept in memory but not saved.
    pub fn from_image(image: DynamicImage) -> Result<Self> {
        check_dimensions(image.width(), image.height())?;
        Ok(Self::wrap(image.into_rgba8()))
    }

    fn wrap(pixels: RgbaImage) -> Self {
        Self {
            id: NEXT_CANVAS_ID.fetch_add(1, Ordering::Relaxed),
            pixels,
            alpha_blending: true,
            save_alpha: false,
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn alpha_blending(&self) -> bool {
        self.alpha_blending
    }

    pub fn set_alpha_blending(&mut self, enabled: bool) {
        self.alpha_blending = enabled;
    }

    pub fn save_alpha(&self) -> bool {
        self.save_alpha
    }

    pub fn set_save_alpha(&mut self, enabled: bool) {
        self.save_alpha = enabled;
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    /// Paint every pixel with `color`.
    pub fn fill(&mut self, color: &ColorHandle) {
        self.fill_rect(
            FillRect {
                x0: 0,
                y0: 0,
                x1: i64::from(self.width()),
                y1: i64::from(self.height()),
            },
            color,
        );
    }

    /// Paint the half-open rectangle `rect`, clipped to the canvas.
    ///
    /// Empty or inverted rectangles draw nothing.
    pub fn fill_rect(&mut self, rect: FillRect, color: &ColorHandle) {
        self.check_handle(color);
        let x0 = rect.x0.max(0);
        let y0 = rect.y0.max(0);
        let x1 = rect.x1.min(i64::from(self.width()));
        let y1 = rect.y1.min(i64::from(self.height()));

        for y in y0..y1 {
            for x in x0..x1 {
                self.put_pixel(x, y, color.rgba());
            }
        }
    }

    /// Draw a single pixel honouring the blending mode. Out-of-bounds
    /// coordinates are ignored.
    pub fn put_pixel(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return;
        }
        let (x, y) = (x as u32, y as u32);

        if self.alpha_blending {
            let below = *self.pixels.get_pixel(x, y);
            self.pixels.put_pixel(x, y, blend_over(below, color));
        } else {
            self.pixels.put_pixel(x, y, color);
        }
    }

    pub(crate) fn check_handle(&self, color: &ColorHandle) {
        debug_assert_eq!(
            color.canvas_id(),
            self.id,
            "color handle allocated for a different canvas"
        );
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(RenderError::Allocation {
            width,
            height,
            reason: "dimensions must be positive".to_string(),
        });
    }

    let pixels = u64::from(width) * u64::from(height);
    if pixels > MAX_CANVAS_PIXELS {
        return Err(RenderError::Allocation {
            width,
            height,
            reason: format!(
                "{} pixels exceed limit of {} pixels",
                pixels, MAX_CANVAS_PIXELS
            ),
        });
    }

    Ok(())
}

/// Blend `foreground` over `background` with straight alpha.
///
/// Uses the "over" operator: result = foreground + background * (1 - foreground.alpha)
pub fn blend_over(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    let fg_alpha = f32::from(foreground[3]) / 255.0;
    let bg_alpha = f32::from(background[3]) / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = f32::from(fg) / 255.0;
        let bg_f = f32::from(bg) / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}
