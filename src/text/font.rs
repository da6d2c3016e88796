//! Scalable font loading, measurement and glyph drawing.
//!
//! Text is positioned by its baseline origin: `(x, y)` is the left end of the
//! baseline of the first glyph. Sizes are in points at 96 DPI. Angles are in
//! degrees, counter-clockwise on screen.
//!
//! Glyphs are rasterized once into a coverage mask and then painted onto the
//! canvas, sampled through the rotation when the angle is non-zero.

use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontVec, Glyph, OutlinedGlyph, PxScale, ScaleFont};
use image::Rgba;

use crate::canvas::{Canvas, ColorHandle, MAX_CANVAS_PIXELS};
use crate::error::{RenderError, Result};

/// Largest single glyph, in pixels, that will be rasterized.
pub const MAX_GLYPH_PIXELS: u64 = 4096 * 4096;

/// A loaded TrueType/OpenType font.
pub struct FontFace {
    path: PathBuf,
    font: FontVec,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("path", &self.path)
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

/// Bounding box of a rendered string, relative to its baseline origin.
///
/// Corners are rotated with the text, in the order lower-left, lower-right,
/// upper-right, upper-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBox {
    pub corners: [(f32, f32); 4],
}

impl TextBox {
    pub fn lower_left(&self) -> (f32, f32) {
        self.corners[0]
    }

    pub fn upper_right(&self) -> (f32, f32) {
        self.corners[2]
    }

    /// Horizontal distance between the lower-left and upper-right corners.
    pub fn width(&self) -> f32 {
        (self.upper_right().0 - self.lower_left().0).abs()
    }

    /// Vertical distance between the lower-left and upper-right corners.
    pub fn height(&self) -> f32 {
        (self.upper_right().1 - self.lower_left().1).abs()
    }
}

/// Anti-aliased coverage of a string, unrotated.
#[derive(Debug, Default)]
struct GlyphMask {
    /// Offset of mask pixel (0, 0) from the baseline origin
    min_x: i64,
    min_y: i64,
    width: u32,
    height: u32,
    coverage: Vec<f32>,
}

impl GlyphMask {
    fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn at(&self, x: i64, y: i64) -> f32 {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return 0.0;
        }
        self.coverage[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Bilinear sample with pixel centers on integer coordinates.
    fn sample(&self, fx: f32, fy: f32) -> f32 {
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = self.at(x0, y0) * (1.0 - tx) + self.at(x0 + 1, y0) * tx;
        let bottom = self.at(x0, y0 + 1) * (1.0 - tx) + self.at(x0 + 1, y0 + 1) * tx;
        top * (1.0 - ty) + bottom * ty
    }
}

/// Half-open integer pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelRect {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl PixelRect {
    fn around(glyph: &OutlinedGlyph) -> Self {
        let bounds = glyph.px_bounds();
        Self {
            x0: bounds.min.x.floor() as i64,
            y0: bounds.min.y.floor() as i64,
            x1: bounds.max.x.ceil() as i64,
            y1: bounds.max.y.ceil() as i64,
        }
    }

    fn enclosing(points: &[(f32, f32)]) -> Self {
        let min_x = points.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
        let max_x = points.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
        let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        Self {
            x0: min_x.floor() as i64,
            y0: min_y.floor() as i64,
            x1: max_x.ceil() as i64,
            y1: max_y.ceil() as i64,
        }
    }

    fn expand(self, by: i64) -> Self {
        Self {
            x0: self.x0 - by,
            y0: self.y0 - by,
            x1: self.x1 + by,
            y1: self.y1 + by,
        }
    }

    fn intersect(self, other: Self) -> Self {
        Self {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }

    fn union(self, other: Self) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    fn width(&self) -> u64 {
        (self.x1 - self.x0).max(0) as u64
    }

    fn height(&self) -> u64 {
        (self.y1 - self.y0).max(0) as u64
    }

    fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    fn area(&self) -> u64 {
        self.width().saturating_mul(self.height())
    }
}

/// Rotate `(x, y)` counter-clockwise on a y-down raster.
fn rotate(x: f32, y: f32, sin: f32, cos: f32) -> (f32, f32) {
    (x * cos + y * sin, -x * sin + y * cos)
}

impl FontFace {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| RenderError::font(path, e))?;
        let font = FontVec::try_from_vec(data).map_err(|e| RenderError::font(path, e))?;

        tracing::debug!(path = %path.display(), glyphs = font.glyph_count(), "Loaded font");

        Ok(Self {
            path: path.to_path_buf(),
            font,
        })
    }

    /// Pixel scale for a point size.
    pub fn px_scale(&self, size: f32) -> PxScale {
        self.font
            .pt_to_px_scale(size)
            .unwrap_or_else(|| PxScale::from(size))
    }

    /// Lay out `text` on a baseline at y = 0, returning glyphs and total advance.
    fn layout(&self, text: &str, scale: PxScale) -> (Vec<Glyph>, f32) {
        let scaled = self.font.as_scaled(scale);
        let mut glyphs = Vec::with_capacity(text.len());
        let mut caret = 0.0f32;
        let mut prev = None;

        for c in text.chars().filter(|c| !c.is_control()) {
            let id = scaled.glyph_id(c);
            if let Some(prev) = prev {
                caret += scaled.kern(prev, id);
            }
            glyphs.push(id.with_scale_and_position(scale, point(caret, 0.0)));
            caret += scaled.h_advance(id);
            prev = Some(id);
        }

        (glyphs, caret)
    }

    /// Bounding box of `text` at `size` points, rotated by `angle` degrees.
    pub fn measure(&self, text: &str, size: f32, angle: f32) -> TextBox {
        let scale = self.px_scale(size);
        let scaled = self.font.as_scaled(scale);
        let (_, advance) = self.layout(text, scale);

        let ascent = scaled.ascent();
        let descent = -scaled.descent();
        let (sin, cos) = angle.to_radians().sin_cos();

        let corners = [
            (0.0, descent),
            (advance, descent),
            (advance, -ascent),
            (0.0, -ascent),
        ]
        .map(|(x, y)| rotate(x, y, sin, cos));

        TextBox { corners }
    }

    /// Rasterize the glyphs of `text` that touch `clip`, a half-open pixel
    /// rectangle in baseline-origin coordinates.
    fn rasterize(&self, text: &str, size: f32, clip: PixelRect) -> Result<GlyphMask> {
        let (glyphs, _) = self.layout(text, self.px_scale(size));

        let mut outlined: Vec<(OutlinedGlyph, PixelRect)> = Vec::new();
        let mut union: Option<PixelRect> = None;
        for glyph in glyphs {
            let Some(glyph) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = PixelRect::around(&glyph);
            if bounds.intersect(clip).is_empty() {
                continue;
            }
            check_area(&bounds, MAX_GLYPH_PIXELS, "glyph")?;

            union = Some(union.map_or(bounds, |u| u.union(bounds)));
            outlined.push((glyph, bounds));
        }

        let Some(union) = union else {
            return Ok(GlyphMask::default());
        };
        let area = union.intersect(clip);
        check_area(&area, MAX_CANVAS_PIXELS, "text mask")?;

        let width = area.width() as u32;
        let height = area.height() as u32;
        let mut coverage = vec![0.0f32; width as usize * height as usize];

        for (glyph, bounds) in &outlined {
            let left = bounds.x0 - area.x0;
            let top = bounds.y0 - area.y0;

            glyph.draw(|gx, gy, c| {
                let x = left + i64::from(gx);
                let y = top + i64::from(gy);
                if x >= 0 && y >= 0 && x < i64::from(width) && y < i64::from(height) {
                    let cell = &mut coverage[y as usize * width as usize + x as usize];
                    *cell = (*cell + c).min(1.0);
                }
            });
        }

        Ok(GlyphMask {
            min_x: area.x0,
            min_y: area.y0,
            width,
            height,
            coverage,
        })
    }

    /// Draw `text` with its baseline origin at `(x, y)`.
    ///
    /// Coverage scales the handle's alpha. Only glyphs that reach the canvas
    /// are rasterized; one larger than [`MAX_GLYPH_PIXELS`] is an
    /// allocation error.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        text: &str,
        size: f32,
        angle: f32,
        x: i32,
        y: i32,
        color: &ColorHandle,
    ) -> Result<()> {
        canvas.check_handle(color);

        let base = color.rgba();
        let base_alpha = f32::from(base[3]);
        let (x, y) = (i64::from(x), i64::from(y));
        let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));

        let paint = |canvas: &mut Canvas, px: i64, py: i64, coverage: f32| {
            let alpha = (coverage.clamp(0.0, 1.0) * base_alpha).round() as u8;
            if alpha > 0 {
                canvas.put_pixel(px, py, Rgba([base[0], base[1], base[2], alpha]));
            }
        };

        let (sin, cos) = angle.to_radians().sin_cos();
        if sin.abs() < 1e-6 && cos > 0.0 {
            let clip = PixelRect {
                x0: -x,
                y0: -y,
                x1: width - x,
                y1: height - y,
            };
            let mask = self.rasterize(text, size, clip)?;

            for my in 0..mask.height {
                for mx in 0..mask.width {
                    let coverage = mask.coverage[my as usize * mask.width as usize + mx as usize];
                    paint(
                        canvas,
                        x + mask.min_x + i64::from(mx),
                        y + mask.min_y + i64::from(my),
                        coverage,
                    );
                }
            }
            return Ok(());
        }

        // Canvas corners in unrotated text space, one pixel wider for sampling
        let (ox, oy) = (x as f32, y as f32);
        let canvas_corners = [(0.0, 0.0), (width as f32, 0.0), (width as f32, height as f32), (0.0, height as f32)]
            .map(|(cx, cy)| {
                let (dx, dy) = (cx - ox, cy - oy);
                (dx * cos - dy * sin, dx * sin + dy * cos)
            });
        let clip = PixelRect::enclosing(&canvas_corners).expand(1);
        let mask = self.rasterize(text, size, clip)?;
        if mask.is_empty() {
            return Ok(());
        }

        let left = mask.min_x as f32;
        let top = mask.min_y as f32;
        let right = left + mask.width as f32;
        let bottom = top + mask.height as f32;
        let corners =
            [(left, top), (right, top), (right, bottom), (left, bottom)].map(|(u, v)| rotate(u, v, sin, cos));
        let dest = PixelRect::enclosing(&corners);

        for dy in dest.y0.max(-y)..dest.y1.min(height - y) {
            for dx in dest.x0.max(-x)..dest.x1.min(width - x) {
                // Inverse rotation of the destination pixel center
                let cx = dx as f32 + 0.5;
                let cy = dy as f32 + 0.5;
                let u = cx * cos - cy * sin;
                let v = cx * sin + cy * cos;

                let coverage = mask.sample(u - left - 0.5, v - top - 0.5);
                if coverage > 0.0 {
                    paint(canvas, x + dx, y + dy, coverage);
                }
            }
        }

        Ok(())
    }
}

fn check_area(rect: &PixelRect, limit: u64, what: &str) -> Result<()> {
    if rect.area() > limit {
        return Err(RenderError::Allocation {
            width: u32::try_from(rect.width()).unwrap_or(u32::MAX),
            height: u32::try_from(rect.height()).unwrap_or(u32::MAX),
            reason: format!("{} of {} pixels exceeds limit of {} pixels", what, rect.area(), limit),
        });
    }
    Ok(())
}
