//! Declarative description of a text image.
//!
//! A [`RenderSpec`] is plain data: the renderer only reads it, apart from its
//! own local copy of the text offset. Descriptions are usually written in YAML:
//!
//! ```yaml
//! full_width: 400
//! full_height: 120
//! border: { left: 4, top: 4, right: 4, bottom: 4 }
//! background_color: "#FFFFFF"
//! border_color: "#202020"
//! lines: ["Hello", "World"]
//! text_offset: { left: 12, top: 40 }
//! line_height: 36
//! font_path: /usr/share/fonts/truetype/dejavu/DejaVuSans.ttf
//! font_size: 20
//! watermark_text: SAMPLE
//! watermark_text_opacity: 0.3
//! format: png
//! ```
//!
//! `${VAR_NAME}` references are replaced with environment variables before
//! parsing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::canvas::Color;
use crate::encoder::OutputFormat;
use crate::error::RenderError;

fn default_background_color() -> Color {
    Color::white()
}

fn default_border_color() -> Color {
    Color::black()
}

fn default_text_color() -> Color {
    Color::black()
}

fn default_font_size() -> f32 {
    12.0
}

fn default_watermark_text_opacity() -> f32 {
    1.0
}

fn default_jpeg_quality() -> u8 {
    75
}

/// Insets of the background fill from the canvas edge, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Border {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Border {
    /// Same inset on every side.
    pub fn uniform(width: u32) -> Self {
        Self {
            left: width,
            top: width,
            right: width,
            bottom: width,
        }
    }
}

/// Where the first caption line starts. `top` is the baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOffset {
    pub left: i32,
    pub top: i32,
}

impl TextOffset {
    pub fn new(left: i32, top: i32) -> Self {
        Self { left, top }
    }
}

/// Everything needed to render one text image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSpec {
    /// Decode the canvas from this file instead of building one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<PathBuf>,

    pub full_width: u32,
    pub full_height: u32,

    #[serde(default)]
    pub border: Border,

    #[serde(default = "default_background_color")]
    pub background_color: Color,

    #[serde(default = "default_border_color")]
    pub border_color: Color,

    /// Fill with full transparency instead of border/background colors
    #[serde(default)]
    pub transparent_background: bool,

    /// Caption lines, drawn in order
    #[serde(default)]
    pub lines: Vec<String>,

    /// Draw only the first line
    #[serde(default)]
    pub strip_text: bool,

    #[serde(default)]
    pub text_offset: TextOffset,

    #[serde(default)]
    pub line_height: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,

    /// Font size in points
    #[serde(default = "default_font_size")]
    pub font_size: f32,

    #[serde(default = "default_text_color")]
    pub text_color: Color,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark_image: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark_text: Option<String>,

    /// Counter-clockwise rotation in degrees
    #[serde(default)]
    pub watermark_text_angle: f32,

    /// 0.0 is invisible, 1.0 is opaque
    #[serde(default = "default_watermark_text_opacity")]
    pub watermark_text_opacity: f32,

    #[serde(default)]
    pub format: OutputFormat,

    /// JPEG quality, 1-100
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl RenderSpec {
    /// A blank white `width` x `height` PNG description.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            background_image: None,
            full_width: width,
            full_height: height,
            border: Border::default(),
            background_color: default_background_color(),
            border_color: default_border_color(),
            transparent_background: false,
            lines: Vec::new(),
            strip_text: false,
            text_offset: TextOffset::default(),
            line_height: 0,
            font_path: None,
            font_size: default_font_size(),
            text_color: default_text_color(),
            watermark_image: None,
            watermark_text: None,
            watermark_text_angle: 0.0,
            watermark_text_opacity: default_watermark_text_opacity(),
            format: OutputFormat::default(),
            jpeg_quality: default_jpeg_quality(),
        }
    }

    pub fn with_background_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.background_image = Some(path.into());
        self
    }

    pub fn with_border(mut self, border: Border, color: Color) -> Self {
        self.border = border;
        self.border_color = color;
        self
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_transparent_background(mut self, transparent: bool) -> Self {
        self.transparent_background = transparent;
        self
    }

    /// Append a caption line.
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn with_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_strip_text(mut self, strip: bool) -> Self {
        self.strip_text = strip;
        self
    }

    pub fn with_text_offset(mut self, left: i32, top: i32) -> Self {
        self.text_offset = TextOffset::new(left, top);
        self
    }

    pub fn with_line_height(mut self, line_height: i32) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn with_font(mut self, path: impl Into<PathBuf>, size: f32) -> Self {
        self.font_path = Some(path.into());
        self.font_size = size;
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    pub fn with_watermark_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.watermark_image = Some(path.into());
        self
    }

    pub fn with_watermark_text(mut self, text: impl Into<String>, angle: f32, opacity: f32) -> Self {
        self.watermark_text = Some(text.into());
        self.watermark_text_angle = angle;
        self.watermark_text_opacity = opacity;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Background file, if one is set. Empty paths count as unset.
    pub fn background_image(&self) -> Option<&Path> {
        non_empty_path(self.background_image.as_deref())
    }

    /// Watermark image file, if one is set. Empty paths count as unset.
    pub fn watermark_image(&self) -> Option<&Path> {
        non_empty_path(self.watermark_image.as_deref())
    }

    /// Watermark text, if any. Empty text counts as unset.
    pub fn watermark_text(&self) -> Option<&str> {
        self.watermark_text.as_deref().filter(|text| !text.is_empty())
    }

    pub fn font_path(&self) -> Option<&Path> {
        non_empty_path(self.font_path.as_deref())
    }

    /// Whether any glyphs have to be drawn, and therefore a font loaded.
    pub fn needs_font(&self) -> bool {
        !self.lines.is_empty() || self.watermark_text().is_some()
    }

    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, RenderError> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| RenderError::Config(e.to_string()))?;

        let mut missing = None;
        let substituted = re.replace_all(yaml, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            })
        });

        if let Some(var_name) = missing {
            return Err(RenderError::Config(format!(
                "Environment variable '{}' is referenced but not set",
                var_name
            )));
        }

        serde_yaml::from_str(&substituted).map_err(|e| RenderError::Config(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RenderError> {
        let yaml = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RenderError::Config(format!(
                "Failed to read render description '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if self.background_image().is_none() && (self.full_width == 0 || self.full_height == 0) {
            return Err(RenderError::Config(format!(
                "Canvas dimensions must be positive, got {}x{}",
                self.full_width, self.full_height
            )));
        }

        if !(0.0..=1.0).contains(&self.watermark_text_opacity) {
            return Err(RenderError::Config(format!(
                "watermark_text_opacity must be between 0.0 and 1.0, got {}",
                self.watermark_text_opacity
            )));
        }

        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(RenderError::Config(format!(
                "font_size must be positive, got {}",
                self.font_size
            )));
        }

        if !self.watermark_text_angle.is_finite() {
            return Err(RenderError::Config(
                "watermark_text_angle must be a finite number".to_string(),
            ));
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(RenderError::Config(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }

        if self.needs_font() && self.font_path().is_none() {
            return Err(RenderError::Config(
                "font_path is required when lines or watermark_text are set".to_string(),
            ));
        }

        Ok(())
    }
}

fn non_empty_path(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}
