//! Text drawing: font handling and caption layout.

pub mod font;
pub mod layout;

pub use font::{FontFace, TextBox};
pub use layout::{draw_lines, line_placements, LinePlacement};

use crate::canvas::Color;

/// Font, size and color shared by every string a render draws.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle<'a> {
    pub font: &'a FontFace,
    /// Size in points
    pub size: f32,
    pub color: Color,
}

impl<'a> TextStyle<'a> {
    pub fn new(font: &'a FontFace, size: f32, color: Color) -> Self {
        Self { font, size, color }
    }
}
