//! Color values and per-canvas color allocation.
//!
//! Colors carry an inverted 7-bit alpha at allocation time: 0 is opaque and
//! 127 is fully transparent. Allocation converts that to the 8-bit straight
//! alpha the raster stores.
//!
//! # Example
//!
//! ```
//! use textimage::canvas::{allocate, Canvas, Color};
//!
//! let canvas = Canvas::new(4, 4).unwrap();
//! let half = allocate(&canvas, Color::new(255, 0, 0), 64);
//! assert_eq!(half.alpha_units(), 64);
//! assert_eq!(half.rgba()[3], 126);
//! ```

use image::Rgba;
use serde::{Deserialize, Serialize};

use super::Canvas;
use crate::error::RenderError;

/// Alpha unit for a fully opaque color.
pub const ALPHA_OPAQUE: u8 = 0;

/// Alpha unit for a fully transparent color.
pub const ALPHA_TRANSPARENT: u8 = 127;

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ColorValue", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// White color.
    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Black color.
    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// `#RRGGBB` representation.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Accepted spellings of a color in a render description.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ColorValue {
    Hex(String),
    Rgb([u8; 3]),
}

impl TryFrom<ColorValue> for Color {
    type Error = RenderError;

    fn try_from(value: ColorValue) -> Result<Self, Self::Error> {
        match value {
            ColorValue::Hex(hex) => parse_hex_color(&hex),
            ColorValue::Rgb([r, g, b]) => Ok(Color::new(r, g, b)),
        }
    }
}

/// Parse a hex color string into RGB components.
///
/// Supports both #RGB and #RRGGBB formats.
pub fn parse_hex_color(hex: &str) -> Result<Color, RenderError> {
    let digits = hex
        .strip_prefix('#')
        .ok_or_else(|| RenderError::Config(format!("Color '{}' must start with '#'", hex)))?;

    let component = |s: &str| {
        u8::from_str_radix(s, 16)
            .map_err(|_| RenderError::Config(format!("Invalid hex digit in color '{}'", hex)))
    };

    match digits.len() {
        // #RGB: each digit doubled, 0xF -> 0xFF
        3 => Ok(Color::new(
            component(&digits[0..1])? * 17,
            component(&digits[1..2])? * 17,
            component(&digits[2..3])? * 17,
        )),
        6 => Ok(Color::new(
            component(&digits[0..2])?,
            component(&digits[2..4])?,
            component(&digits[4..6])?,
        )),
        n => Err(RenderError::Config(format!(
            "Color must be #RGB or #RRGGBB format, got {} characters",
            n
        ))),
    }
}

/// A color resolved against one canvas.
///
/// Only valid for drawing on the canvas it was allocated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorHandle {
    canvas_id: u64,
    alpha_units: u8,
    rgba: Rgba<u8>,
}

impl ColorHandle {
    /// Inverted 7-bit alpha this handle was allocated with.
    pub fn alpha_units(&self) -> u8 {
        self.alpha_units
    }

    /// Straight 8-bit RGBA value written to the raster.
    pub fn rgba(&self) -> Rgba<u8> {
        self.rgba
    }

    pub(crate) fn canvas_id(&self) -> u64 {
        self.canvas_id
    }
}

/// Resolve `color` with the given alpha units against `canvas`.
///
/// Alpha units above 127 are clamped to fully transparent.
pub fn allocate(canvas: &Canvas, color: Color, alpha_units: u8) -> ColorHandle {
    let alpha_units = alpha_units.min(ALPHA_TRANSPARENT);
    ColorHandle {
        canvas_id: canvas.id(),
        alpha_units,
        rgba: Rgba([color.r, color.g, color.b, alpha_units_to_alpha8(alpha_units)]),
    }
}

/// Convert inverted 7-bit alpha units to straight 8-bit alpha.
pub fn alpha_units_to_alpha8(alpha_units: u8) -> u8 {
    let units = f32::from(alpha_units.min(ALPHA_TRANSPARENT));
    (255.0 - units * 255.0 / 127.0).round() as u8
}

/// Convert an opacity in `[0, 1]` (1 = opaque) to alpha units (0 = opaque).
///
/// Out-of-range and NaN opacities are clamped.
pub fn opacity_to_alpha_units(opacity: f32) -> u8 {
    let opacity = if opacity.is_nan() {
        0.0
    } else {
        opacity.clamp(0.0, 1.0)
    };
    ((1.0 - opacity) * f32::from(ALPHA_TRANSPARENT)).round() as u8
}
