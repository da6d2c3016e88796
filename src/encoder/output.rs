//! Writing the encoded canvas to durable storage.
//!
//! Output files get a collision-free name from the platform temp-file
//! facility with the format suffix already in place, so the returned path and
//! format always agree with what is on disk. The caller owns the file.

use std::io::Write;
use std::path::{Path, PathBuf};

use super::{encode_to_vec, EncoderQuality, OutputFormat};
use crate::canvas::Canvas;
use crate::error::{RenderError, Result};

const FILE_PREFIX: &str = "textimage-";

/// Handle to an encoded image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub file_path: PathBuf,
    pub format: OutputFormat,
}

/// Encode `canvas` into a new file in the system temp directory.
///
/// The canvas is consumed and released whether or not encoding succeeds.
pub fn encode(canvas: Canvas, format: OutputFormat, quality: EncoderQuality) -> Result<RenderedImage> {
    encode_in(&std::env::temp_dir(), canvas, format, quality)
}

/// Encode `canvas` into a new file inside `dir`.
pub fn encode_in(
    dir: &Path,
    canvas: Canvas,
    format: OutputFormat,
    quality: EncoderQuality,
) -> Result<RenderedImage> {
    let encoded = encode_to_vec(&canvas, format, quality)?;
    drop(canvas);

    let suffix = format!(".{}", format.as_str());
    let mut file = tempfile::Builder::new()
        .prefix(FILE_PREFIX)
        .suffix(&suffix)
        .tempfile_in(dir)?;

    file.write_all(&encoded.data)?;
    file.flush()?;

    let temp_path = file.path().to_path_buf();
    let (_, file_path) = file.keep().map_err(|e| RenderError::Persist {
        path: temp_path,
        message: e.to_string(),
    })?;

    tracing::debug!(
        path = %file_path.display(),
        format = %format,
        bytes = encoded.data.len(),
        "Wrote rendered image"
    );

    Ok(RenderedImage { file_path, format })
}
