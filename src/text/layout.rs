//! Caption line placement.
//!
//! Lines are drawn top to bottom starting at the configured offset, each one
//! `line_height` pixels below the previous baseline. No wrapping or width
//! measurement happens here; line breaking belongs to whoever builds the
//! description.

use super::TextStyle;
use crate::canvas::{allocate, Canvas, ALPHA_OPAQUE};
use crate::config::TextOffset;
use crate::error::Result;

/// Where one caption line was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePlacement {
    /// Index into the input lines
    pub index: usize,
    pub left: i32,
    /// Baseline
    pub top: i32,
}

/// Baseline positions for `line_count` lines.
///
/// In strip mode only the first line is placed.
pub fn line_placements(
    line_count: usize,
    start: TextOffset,
    line_height: i32,
    strip: bool,
) -> Vec<LinePlacement> {
    let count = if strip { line_count.min(1) } else { line_count };
    let mut offset = start;
    let mut placements = Vec::with_capacity(count);

    for index in 0..count {
        placements.push(LinePlacement {
            index,
            left: offset.left,
            top: offset.top,
        });
        offset.top = offset.top.saturating_add(line_height);
    }

    placements
}

/// Draw `lines` onto `canvas` and report where each one went.
///
/// Stops at the first line that cannot be rasterized.
pub fn draw_lines<S: AsRef<str>>(
    canvas: &mut Canvas,
    lines: &[S],
    style: &TextStyle<'_>,
    start: TextOffset,
    line_height: i32,
    strip: bool,
) -> Result<Vec<LinePlacement>> {
    let placements = line_placements(lines.len(), start, line_height, strip);
    if placements.is_empty() {
        return Ok(placements);
    }

    let color = allocate(canvas, style.color, ALPHA_OPAQUE);
    for placement in &placements {
        let line = lines[placement.index].as_ref();
        style.font.draw(
            canvas,
            line,
            style.size,
            0.0,
            placement.left,
            placement.top,
            &color,
        )?;
        tracing::trace!(
            line = placement.index,
            left = placement.left,
            top = placement.top,
            "Drew caption line"
        );
    }

    Ok(placements)
}
