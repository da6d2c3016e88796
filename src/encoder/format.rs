//! Output format tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output format of a rendered image.
///
/// Parsing is lenient: any unrecognized tag becomes [`OutputFormat::Png`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpg,
    Gif,
}

impl OutputFormat {
    /// Parse a format tag (case-insensitive). `jpeg` is accepted for JPG.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpg),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Parse a format tag, falling back to PNG when it is not recognized.
    pub fn parse_or_png(tag: &str) -> Self {
        Self::parse(tag).unwrap_or_else(|| {
            tracing::warn!(format = tag, "Unrecognized output format, using png");
            Self::Png
        })
    }

    /// Tag reported in results and used as the file suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Gif => "gif",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpg => "image/jpeg",
            Self::Gif => "image/gif",
        }
    }
}

impl From<String> for OutputFormat {
    fn from(tag: String) -> Self {
        Self::parse_or_png(&tag)
    }
}

impl From<&str> for OutputFormat {
    fn from(tag: &str) -> Self {
        Self::parse_or_png(tag)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
