//! The render pipeline.
//!
//! A render is a stateless function of a [`RenderSpec`]:
//!
//! 1. Build the base canvas (loaded background, transparent fill, or bordered
//!    fill; exactly one of these).
//! 2. Draw the caption lines.
//! 3. Composite the image watermark, then the text watermark, when present.
//! 4. Encode the canvas and write it to a fresh file.
//!
//! Any failure aborts the render; no partial output is returned.

use std::path::Path;

use crate::canvas::{create_empty, create_from_file, Canvas, ALPHA_OPAQUE};
use crate::config::RenderSpec;
use crate::encoder::{encode_in, encode_to_vec, EncodedImage, EncoderQuality, RenderedImage};
use crate::error::Result;
use crate::text::{draw_lines, FontFace, TextStyle};
use crate::watermark::{apply_image_watermark, apply_text_watermark};

/// Render `spec` into a new file in the system temp directory.
pub fn render(spec: &RenderSpec) -> Result<RenderedImage> {
    render_in(spec, &std::env::temp_dir())
}

/// Render `spec` into a new file inside `dir`.
pub fn render_in(spec: &RenderSpec, dir: &Path) -> Result<RenderedImage> {
    let span = tracing::info_span!(
        "render",
        format = %spec.format,
        lines = spec.lines.len(),
        from_file = spec.background_image().is_some(),
    );
    let _enter = span.enter();

    let result = render_canvas(spec)
        .and_then(|canvas| encode_in(dir, canvas, spec.format, quality_for(spec)));

    match &result {
        Ok(rendered) => tracing::info!(
            path = %rendered.file_path.display(),
            format = %rendered.format,
            "Render complete"
        ),
        Err(e) => tracing::error!(kind = e.kind(), error = %e, "Render failed"),
    }

    result
}

/// Render `spec` and return the encoded bytes without touching the disk.
pub fn render_to_vec(spec: &RenderSpec) -> Result<EncodedImage> {
    let canvas = render_canvas(spec)?;
    encode_to_vec(&canvas, spec.format, quality_for(spec))
}

/// Run every drawing step of `spec` and return the finished canvas.
pub fn render_canvas(spec: &RenderSpec) -> Result<Canvas> {
    spec.validate()?;

    let mut canvas = base_canvas(spec)?;

    // Loaded once, shared by captions and watermark text
    let font = match spec.font_path() {
        Some(path) if spec.needs_font() => Some(FontFace::load(path)?),
        _ => None,
    };

    if let Some(font) = &font {
        let style = TextStyle::new(font, spec.font_size, spec.text_color);
        let placements = draw_lines(
            &mut canvas,
            spec.lines.as_slice(),
            &style,
            spec.text_offset,
            spec.line_height,
            spec.strip_text,
        )?;
        tracing::debug!(drawn = placements.len(), strip = spec.strip_text, "Drew caption");
    }

    if let Some(path) = spec.watermark_image() {
        let position = apply_image_watermark(&mut canvas, path, ALPHA_OPAQUE)?;
        tracing::debug!(x = position.x, y = position.y, "Applied watermark image");
    }

    if let (Some(text), Some(font)) = (spec.watermark_text(), &font) {
        let style = TextStyle::new(font, spec.font_size, spec.text_color);
        let placed = apply_text_watermark(
            &mut canvas,
            text,
            &style,
            spec.watermark_text_angle,
            spec.watermark_text_opacity,
        )?;
        tracing::debug!(
            alpha_units = placed.alpha_units,
            width = placed.text_width,
            height = placed.text_height,
            "Applied watermark text"
        );
    }

    Ok(canvas)
}

fn base_canvas(spec: &RenderSpec) -> Result<Canvas> {
    match spec.background_image() {
        Some(path) => create_from_file(path),
        None => create_empty(
            spec.full_width,
            spec.full_height,
            &spec.border,
            spec.background_color,
            spec.border_color,
            spec.transparent_background,
        ),
    }
}

fn quality_for(spec: &RenderSpec) -> EncoderQuality {
    EncoderQuality::with_quality(spec.jpeg_quality)
}
