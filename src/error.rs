//! Render error types.
//!
//! Every failure aborts the whole render. No partial image is ever returned.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while rendering a text image.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Background or watermark file missing, unreadable, or not of the codec
    /// implied by its extension
    #[error("Failed to decode image '{}': {message}", path.display())]
    Decode { path: PathBuf, message: String },

    /// Canvas could not be allocated
    #[error("Failed to allocate {width}x{height} canvas: {reason}")]
    Allocation {
        width: u32,
        height: u32,
        reason: String,
    },

    /// Output codec failed to serialize the canvas
    #[error("Failed to encode to {format}: {message}")]
    Encode { format: String, message: String },

    /// Font file missing or not a usable TrueType/OpenType font
    #[error("Failed to load font '{}': {message}", path.display())]
    Font { path: PathBuf, message: String },

    /// Encoded output could not be kept on durable storage
    #[error("Failed to persist output '{}': {message}", path.display())]
    Persist { path: PathBuf, message: String },

    /// Invalid render description
    #[error("Render description error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    pub fn decode(path: impl AsRef<Path>, message: impl ToString) -> Self {
        Self::Decode {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn encode(format: impl Into<String>, message: impl ToString) -> Self {
        Self::Encode {
            format: format.into(),
            message: message.to_string(),
        }
    }

    pub fn font(path: impl AsRef<Path>, message: impl ToString) -> Self {
        Self::Font {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Short machine-readable name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode { .. } => "decode",
            Self::Allocation { .. } => "allocation",
            Self::Encode { .. } => "encode",
            Self::Font { .. } => "font",
            Self::Persist { .. } => "persist",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
