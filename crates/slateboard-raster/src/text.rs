//! Glyph measurement and rasterization.
//!
//! The engine does not bundle a typeface; the embedding shell hands us
//! font bytes at startup. Without a font, measurement falls back to an
//! approximate per-character advance so caret math keeps working, and
//! glyph painting is skipped.

use crate::{RasterError, RasterResult};
use ab_glyph::{Font, FontArc, PxScale, ScaleFont};

/// Approximate advance per character (fraction of font size) used when
/// no font is loaded.
const FALLBACK_ADVANCE: f64 = 0.6;

/// Horizontal shear applied for synthetic italics.
const ITALIC_SKEW: f32 = 0.2;

/// Style of a text run: size in logical pixels plus bold/italic flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 16.0,
            bold: false,
            italic: false,
        }
    }
}

/// Rasterizes text runs into coverage values.
///
/// Bold and italic are synthesized (double stamp and shear) rather than
/// resolved to separate font faces, matching the single-face setup of
/// the rest of the surface.
#[derive(Debug, Clone, Default)]
pub struct TextRasterizer {
    font: Option<FontArc>,
}

impl TextRasterizer {
    /// Create a rasterizer with no font loaded (measurement fallback only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a rasterizer from raw TTF/OTF bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> RasterResult<Self> {
        let font = FontArc::try_from_vec(bytes).map_err(|_| RasterError::Font)?;
        Ok(Self { font: Some(font) })
    }

    /// Whether a font is available for glyph painting.
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Measure the advance width of `text` at the given size, in the
    /// same units the size is expressed in.
    pub fn measure(&self, text: &str, size: f64) -> f64 {
        match &self.font {
            Some(font) => {
                let scaled = font.as_scaled(PxScale::from(size as f32));
                let mut width = 0.0f32;
                let mut prev = None;
                for ch in text.chars() {
                    let id = scaled.glyph_id(ch);
                    if let Some(p) = prev {
                        width += scaled.kern(p, id);
                    }
                    width += scaled.h_advance(id);
                    prev = Some(id);
                }
                width as f64
            }
            None => FALLBACK_ADVANCE * size * text.chars().count() as f64,
        }
    }

    /// Rasterize `text` with its top-left corner at the origin, calling
    /// `stamp(x, y, coverage)` for each covered pixel in device units.
    ///
    /// Coordinates are relative to the origin; the caller applies the
    /// surface transform and blending. No-op when no font is loaded.
    pub fn for_each_coverage<F>(&self, text: &str, size: f32, style: &TextStyle, mut stamp: F)
    where
        F: FnMut(f32, f32, f32),
    {
        let Some(font) = &self.font else {
            return;
        };

        let scale = PxScale::from(size);
        let scaled = font.as_scaled(scale);
        let ascent = scaled.ascent();
        // Thin synthetic bold: a second stamp one "stem" to the right.
        let bold_offset = if style.bold { (size / 24.0).max(1.0) } else { 0.0 };

        let mut caret = 0.0f32;
        let mut prev = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(p) = prev {
                caret += scaled.kern(p, id);
            }
            let glyph = id.with_scale_and_position(scale, ab_glyph::point(caret, ascent));
            if let Some(outline) = font.outline_glyph(glyph) {
                let bounds = outline.px_bounds();
                outline.draw(|gx, gy, cov| {
                    if cov <= 0.0 {
                        return;
                    }
                    let py = bounds.min.y + gy as f32;
                    let mut px = bounds.min.x + gx as f32;
                    if style.italic {
                        // Shear around the baseline.
                        px += ITALIC_SKEW * (ascent - py);
                    }
                    stamp(px, py, cov.min(1.0));
                    if bold_offset > 0.0 {
                        stamp(px + bold_offset, py, cov.min(1.0));
                    }
                });
            }
            caret += scaled.h_advance(id);
            prev = Some(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_measure_scales_with_length() {
        let raster = TextRasterizer::new();
        assert!(!raster.has_font());

        let one = raster.measure("a", 16.0);
        let four = raster.measure("abcd", 16.0);
        assert!((four - one * 4.0).abs() < 1e-9);
        assert!((one - 0.6 * 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_measure_empty() {
        let raster = TextRasterizer::new();
        assert_eq!(raster.measure("", 16.0), 0.0);
    }

    #[test]
    fn test_no_font_paints_nothing() {
        let raster = TextRasterizer::new();
        let mut stamped = 0usize;
        raster.for_each_coverage("hello", 16.0, &TextStyle::default(), |_, _, _| {
            stamped += 1;
        });
        assert_eq!(stamped, 0);
    }

    #[test]
    fn test_invalid_font_bytes_rejected() {
        assert!(matches!(
            TextRasterizer::from_bytes(vec![0, 1, 2, 3]),
            Err(RasterError::Font)
        ));
    }
}
