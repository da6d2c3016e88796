//! Serializing the final canvas.
//!
//! - [`format`]: output format tags with PNG fallback
//! - [`codec`]: PNG, JPEG and GIF encoders behind one trait
//! - [`output`]: writing to a uniquely named, correctly suffixed file

pub mod codec;
pub mod format;
pub mod output;

pub use codec::{
    encode_to_vec, EncodedImage, EncoderFactory, EncoderQuality, FormatEncoder, GifEncoder,
    JpegEncoder, PngEncoder,
};
pub use format::OutputFormat;
pub use output::{encode, encode_in, RenderedImage};
