//! Raster surface: an RGBA device-pixel buffer with a viewport transform.
//!
//! All painting entry points take logical (drawing-space) coordinates;
//! the surface applies the current `scale * dpr` / `offset * dpr`
//! transform on every write. Callers never re-derive device-pixel math.

use crate::text::{TextRasterizer, TextStyle};
use crate::{RasterResult, codec};
use image::{Rgba, RgbaImage};
use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;

/// Pixel composite mode, mirroring the two canvas blend modes the
/// drawing pipeline uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Normal alpha blending (pen, shapes, text).
    #[default]
    SourceOver,
    /// Erase: reduces destination alpha by source coverage.
    DestinationOut,
}

/// A software raster surface.
#[derive(Debug, Clone)]
pub struct Surface {
    /// Device-pixel buffer (display size x dpr).
    pixels: RgbaImage,
    /// Logical display size.
    display: Size,
    /// Device pixel ratio.
    dpr: f64,
    /// Viewport scale component of the transform.
    scale: f64,
    /// Viewport offset component of the transform (display pixels).
    offset: Vec2,
    /// Active composite mode.
    composite: CompositeMode,
}

impl Surface {
    /// Create a transparent surface for the given display size and
    /// device pixel ratio, with an identity viewport transform.
    pub fn new(display: Size, dpr: f64) -> Self {
        let (w, h) = device_dims(display, dpr);
        Self {
            pixels: RgbaImage::new(w, h),
            display,
            dpr,
            scale: 1.0,
            offset: Vec2::ZERO,
            composite: CompositeMode::SourceOver,
        }
    }

    /// Logical display size.
    pub fn display(&self) -> Size {
        self.display
    }

    /// Device pixel ratio.
    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    /// Device buffer dimensions.
    pub fn device_size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Raw pixel buffer access.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Set the viewport transform applied to subsequent writes.
    pub fn set_transform(&mut self, scale: f64, offset: Vec2) {
        self.scale = scale;
        self.offset = offset;
    }

    /// Set the composite mode for subsequent writes.
    pub fn set_composite(&mut self, mode: CompositeMode) {
        self.composite = mode;
    }

    /// Current composite mode.
    pub fn composite(&self) -> CompositeMode {
        self.composite
    }

    /// Clear the whole device buffer to transparent, ignoring the
    /// transform. The transform itself is left untouched.
    pub fn clear_device(&mut self) {
        for px in self.pixels.pixels_mut() {
            *px = Rgba([0, 0, 0, 0]);
        }
    }

    /// Reallocate the device buffer for a new display size / dpr.
    /// The buffer starts blank; the caller repaints from its last
    /// committed snapshot.
    pub fn resize(&mut self, display: Size, dpr: f64) {
        let (w, h) = device_dims(display, dpr);
        self.display = display;
        self.dpr = dpr;
        self.pixels = RgbaImage::new(w, h);
    }

    /// Encode the device buffer as PNG bytes.
    pub fn encode(&self) -> RasterResult<Vec<u8>> {
        codec::encode_png(&self.pixels)
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|p| p.0[3] == 0)
    }

    fn scale_dev(&self) -> f64 {
        self.scale * self.dpr
    }

    fn to_device(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale_dev() + self.offset.x * self.dpr,
            p.y * self.scale_dev() + self.offset.y * self.dpr,
        )
    }

    /// Paint one freehand/line segment with round caps.
    pub fn stroke_segment(&mut self, a: Point, b: Point, width: f64, color: Color) {
        let half = (width * self.scale_dev() / 2.0).max(0.5);
        let a = self.to_device(a);
        let b = self.to_device(b);
        let rgba = to_rgba(color);

        let x0 = (a.x.min(b.x) - half - 1.0).floor() as i64;
        let x1 = (a.x.max(b.x) + half + 1.0).ceil() as i64;
        let y0 = (a.y.min(b.y) - half - 1.0).floor() as i64;
        let y1 = (a.y.max(b.y) + half + 1.0).ceil() as i64;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let c = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let d = dist_to_segment(c, a, b);
                let cov = (half - d + 0.5).clamp(0.0, 1.0);
                if cov > 0.0 {
                    self.blend(x, y, rgba, cov as f32);
                }
            }
        }
    }

    /// Paint a rectangle outline. The rect may have negative extents
    /// (drag towards the upper-left); edges are stroked as given.
    pub fn stroke_rect(&mut self, rect: Rect, width: f64, color: Color) {
        let tl = Point::new(rect.x0, rect.y0);
        let tr = Point::new(rect.x1, rect.y0);
        let br = Point::new(rect.x1, rect.y1);
        let bl = Point::new(rect.x0, rect.y1);
        self.stroke_segment(tl, tr, width, color);
        self.stroke_segment(tr, br, width, color);
        self.stroke_segment(br, bl, width, color);
        self.stroke_segment(bl, tl, width, color);
    }

    /// Paint a circle outline centered at `center`.
    pub fn stroke_circle(&mut self, center: Point, radius: f64, width: f64, color: Color) {
        let half = (width * self.scale_dev() / 2.0).max(0.5);
        let c = self.to_device(center);
        let r = radius * self.scale_dev();
        let rgba = to_rgba(color);

        let x0 = (c.x - r - half - 1.0).floor() as i64;
        let x1 = (c.x + r + half + 1.0).ceil() as i64;
        let y0 = (c.y - r - half - 1.0).floor() as i64;
        let y1 = (c.y + r + half + 1.0).ceil() as i64;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let d = (p.distance(c) - r).abs();
                let cov = (half - d + 0.5).clamp(0.0, 1.0);
                if cov > 0.0 {
                    self.blend(x, y, rgba, cov as f32);
                }
            }
        }
    }

    /// Paint a text run with its top-left corner at `pos`.
    pub fn fill_text(
        &mut self,
        rasterizer: &TextRasterizer,
        text: &str,
        pos: Point,
        style: &TextStyle,
        color: Color,
    ) {
        let origin = self.to_device(pos);
        let size_dev = (style.size * self.scale_dev()) as f32;
        let rgba = to_rgba(color);

        let mut stamps: Vec<(i64, i64, f32)> = Vec::new();
        rasterizer.for_each_coverage(text, size_dev, style, |x, y, cov| {
            let px = (origin.x + x as f64).round() as i64;
            let py = (origin.y + y as f64).round() as i64;
            stamps.push((px, py, cov));
        });
        for (x, y, cov) in stamps {
            self.blend(x, y, rgba, cov);
        }
    }

    /// Draw a decoded snapshot image stretched over the logical display
    /// rect, through the current transform. Used for undo/redo/load
    /// repaints.
    pub fn draw_image(&mut self, src: &RgbaImage) {
        let (src_w, src_h) = src.dimensions();
        if src_w == 0 || src_h == 0 || self.display.width <= 0.0 || self.display.height <= 0.0 {
            return;
        }

        let tl = self.to_device(Point::ZERO);
        let br = self.to_device(Point::new(self.display.width, self.display.height));
        let (buf_w, buf_h) = self.pixels.dimensions();

        let x0 = tl.x.min(br.x).floor().max(0.0) as i64;
        let x1 = (tl.x.max(br.x).ceil() as i64).min(buf_w as i64);
        let y0 = tl.y.min(br.y).floor().max(0.0) as i64;
        let y1 = (tl.y.max(br.y).ceil() as i64).min(buf_h as i64);

        let scale_dev = self.scale_dev();
        let off = Vec2::new(self.offset.x * self.dpr, self.offset.y * self.dpr);

        for y in y0..y1 {
            for x in x0..x1 {
                // Invert the transform at the pixel center, then sample
                // the source with nearest-neighbor.
                let lx = (x as f64 + 0.5 - off.x) / scale_dev;
                let ly = (y as f64 + 0.5 - off.y) / scale_dev;
                let u = lx / self.display.width;
                let v = ly / self.display.height;
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    continue;
                }
                let sx = ((u * src_w as f64).floor() as u32).min(src_w - 1);
                let sy = ((v * src_h as f64).floor() as u32).min(src_h - 1);
                let px = *src.get_pixel(sx, sy);
                self.blend_source_pixel(x, y, px.0);
            }
        }
    }

    /// Blend a straight-alpha source pixel (source-over, full coverage).
    /// Writing onto a fully transparent destination copies the source
    /// byte-for-byte so snapshot restores are exact.
    fn blend_source_pixel(&mut self, x: i64, y: i64, src: [u8; 4]) {
        let (w, h) = self.pixels.dimensions();
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            return;
        }
        let dst = self.pixels.get_pixel_mut(x as u32, y as u32);
        if dst.0[3] == 0 {
            dst.0 = src;
            return;
        }
        if src[3] == 0 {
            return;
        }
        let sa = src[3] as f32 / 255.0;
        let da = dst.0[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            dst.0 = [0, 0, 0, 0];
            return;
        }
        for i in 0..3 {
            let sc = src[i] as f32;
            let dc = dst.0[i] as f32;
            dst.0[i] = ((sc * sa + dc * da * (1.0 - sa)) / out_a).round() as u8;
        }
        dst.0[3] = (out_a * 255.0).round() as u8;
    }

    fn blend(&mut self, x: i64, y: i64, color: [u8; 4], cov: f32) {
        let (w, h) = self.pixels.dimensions();
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            return;
        }
        let sa = color[3] as f32 / 255.0 * cov.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let dst = self.pixels.get_pixel_mut(x as u32, y as u32);
        match self.composite {
            CompositeMode::SourceOver => {
                if dst.0[3] == 0 {
                    dst.0 = [color[0], color[1], color[2], (sa * 255.0).round() as u8];
                    return;
                }
                let da = dst.0[3] as f32 / 255.0;
                let out_a = sa + da * (1.0 - sa);
                for i in 0..3 {
                    let sc = color[i] as f32;
                    let dc = dst.0[i] as f32;
                    dst.0[i] = ((sc * sa + dc * da * (1.0 - sa)) / out_a).round() as u8;
                }
                dst.0[3] = (out_a * 255.0).round() as u8;
            }
            CompositeMode::DestinationOut => {
                // Keep color, knock out alpha.
                let da = dst.0[3] as f32 / 255.0;
                dst.0[3] = (da * (1.0 - sa) * 255.0).round() as u8;
            }
        }
    }
}

fn device_dims(display: Size, dpr: f64) -> (u32, u32) {
    let w = (display.width * dpr).round().max(1.0) as u32;
    let h = (display.height * dpr).round().max(1.0) as u32;
    (w, h)
}

fn to_rgba(color: Color) -> [u8; 4] {
    let c = color.to_rgba8();
    [c.r, c.g, c.b, c.a]
}

fn dist_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
