//! Per-format canvas encoders.
//!
//! Provides a trait-based encoder system so the output step can:
//! - pick a codec from an [`OutputFormat`] tag
//! - honour the canvas's `save_alpha` flag consistently across formats
//! - share quality settings

use std::io::Cursor;

use image::codecs::gif::GifEncoder as ImageGifEncoder;
use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
use image::codecs::png::PngEncoder as ImagePngEncoder;
use image::{ColorType, ImageEncoder as _, RgbaImage};

use super::OutputFormat;
use crate::canvas::Canvas;
use crate::error::{RenderError, Result};

/// Quality settings for image encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderQuality {
    /// JPEG quality (1-100, where 100 is best quality)
    pub quality: u8,
}

impl Default for EncoderQuality {
    fn default() -> Self {
        Self { quality: 75 }
    }
}

impl EncoderQuality {
    /// Create quality settings with specified quality level
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

/// Result of encoding a canvas
#[derive(Debug)]
pub struct EncodedImage {
    /// The encoded image data
    pub data: Vec<u8>,
    /// The output format
    pub format: OutputFormat,
    /// MIME type of `data`
    pub content_type: &'static str,
}

impl EncodedImage {
    pub fn new(data: Vec<u8>, format: OutputFormat) -> Self {
        Self {
            data,
            format,
            content_type: format.content_type(),
        }
    }
}

/// Encodes raw canvas pixels into one output format.
pub trait FormatEncoder: Send + Sync {
    /// The output format this encoder produces
    fn format(&self) -> OutputFormat;

    /// Encode `pixels`, keeping the alpha channel only when `save_alpha` is
    /// set and the format can carry it.
    fn encode(
        &self,
        pixels: &RgbaImage,
        save_alpha: bool,
        quality: EncoderQuality,
    ) -> Result<EncodedImage>;
}

/// PNG encoder
pub struct PngEncoder;

impl FormatEncoder for PngEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Png
    }

    fn encode(
        &self,
        pixels: &RgbaImage,
        save_alpha: bool,
        _quality: EncoderQuality,
    ) -> Result<EncodedImage> {
        let mut output = Cursor::new(Vec::new());
        let encoder = ImagePngEncoder::new(&mut output);
        let (width, height) = pixels.dimensions();

        let result = if save_alpha {
            encoder.write_image(pixels.as_raw(), width, height, ColorType::Rgba8)
        } else {
            encoder.write_image(&rgba_to_rgb(pixels.as_raw()), width, height, ColorType::Rgb8)
        };
        result.map_err(|e| RenderError::encode("png", e))?;

        Ok(EncodedImage::new(output.into_inner(), OutputFormat::Png))
    }
}

/// JPEG encoder. The alpha channel is always dropped.
pub struct JpegEncoder;

impl FormatEncoder for JpegEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Jpg
    }

    fn encode(
        &self,
        pixels: &RgbaImage,
        _save_alpha: bool,
        quality: EncoderQuality,
    ) -> Result<EncodedImage> {
        let rgb_data = rgba_to_rgb(pixels.as_raw());
        let (width, height) = pixels.dimensions();

        let mut output = Cursor::new(Vec::new());
        let encoder = ImageJpegEncoder::new_with_quality(&mut output, quality.quality);

        encoder
            .write_image(&rgb_data, width, height, ColorType::Rgb8)
            .map_err(|e| RenderError::encode("jpg", e))?;

        Ok(EncodedImage::new(output.into_inner(), OutputFormat::Jpg))
    }
}

/// GIF encoder. Colors are quantized to a 256-entry palette.
pub struct GifEncoder;

impl FormatEncoder for GifEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Gif
    }

    fn encode(
        &self,
        pixels: &RgbaImage,
        save_alpha: bool,
        _quality: EncoderQuality,
    ) -> Result<EncodedImage> {
        let (width, height) = pixels.dimensions();
        let opaque;
        let data = if save_alpha {
            pixels.as_raw()
        } else {
            opaque = force_opaque(pixels.as_raw());
            &opaque
        };

        let mut output = Vec::new();
        {
            // The trailer is written when the encoder drops
            let mut encoder = ImageGifEncoder::new(&mut output);
            encoder
                .encode(data, width, height, ColorType::Rgba8)
                .map_err(|e| RenderError::encode("gif", e))?;
        }

        Ok(EncodedImage::new(output, OutputFormat::Gif))
    }
}

/// Factory for creating encoders based on output format
pub struct EncoderFactory;

impl EncoderFactory {
    pub fn create(format: OutputFormat) -> Box<dyn FormatEncoder> {
        match format {
            OutputFormat::Png => Box::new(PngEncoder),
            OutputFormat::Jpg => Box::new(JpegEncoder),
            OutputFormat::Gif => Box::new(GifEncoder),
        }
    }
}

/// Encode `canvas` in memory.
pub fn encode_to_vec(
    canvas: &Canvas,
    format: OutputFormat,
    quality: EncoderQuality,
) -> Result<EncodedImage> {
    EncoderFactory::create(format).encode(canvas.pixels(), canvas.save_alpha(), quality)
}

/// Convert RGBA to RGB by discarding alpha channel
fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for chunk in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&chunk[..3]);
    }
    rgb
}

fn force_opaque(rgba: &[u8]) -> Vec<u8> {
    let mut data = rgba.to_vec();
    for chunk in data.chunks_exact_mut(4) {
        chunk[3] = 255;
    }
    data
}
