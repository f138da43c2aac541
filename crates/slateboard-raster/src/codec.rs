//! PNG codec for history snapshots and persistence payloads.

use crate::{RasterError, RasterResult};
use image::RgbaImage;

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(pixels: &RgbaImage) -> RasterResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, pixels.width(), pixels.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| RasterError::Encode(e.to_string()))?;
        writer
            .write_image_data(pixels.as_raw())
            .map_err(|e| RasterError::Encode(e.to_string()))?;
    }
    Ok(png_data)
}

/// Decode PNG (or any supported image) bytes into an RGBA buffer.
pub fn decode_png(bytes: &[u8]) -> RasterResult<RgbaImage> {
    let decoded = image::load_from_memory(bytes).map_err(|e| {
        log::warn!("snapshot decode failed: {e}");
        RasterError::Decode(e.to_string())
    })?;
    Ok(decoded.to_rgba8())
}
