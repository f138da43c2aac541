//! Slateboard Raster Library
//!
//! Software rasterization substrate for the Slateboard whiteboard: an
//! RGBA pixel buffer with a viewport transform, composite modes for
//! pen/eraser drawing, shape and text painting, and a PNG codec for
//! history snapshots.

pub mod codec;
pub mod surface;
pub mod text;

pub use image::RgbaImage;
pub use surface::{CompositeMode, Surface};
pub use text::{TextRasterizer, TextStyle};

use thiserror::Error;

/// Errors produced by raster operations.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("PNG encode failed: {0}")]
    Encode(String),
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("invalid font data")]
    Font,
}

/// Result type for raster operations.
pub type RasterResult<T> = Result<T, RasterError>;
