// Textimage: declarative text image rendering library

pub mod canvas;
pub mod config;
pub mod encoder;
pub mod error;
pub mod logging;
pub mod renderer;
pub mod text;
pub mod watermark;

pub use config::{Border, RenderSpec, TextOffset};
pub use encoder::{OutputFormat, RenderedImage};
pub use error::{RenderError, Result};
pub use renderer::{render, render_canvas, render_in, render_to_vec};
