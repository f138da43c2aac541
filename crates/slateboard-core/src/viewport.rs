//! Viewport model: pan/zoom transform and screen-to-logical mapping.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum allowed zoom scale.
pub const MIN_SCALE: f64 = 0.1;
/// Maximum allowed zoom scale.
pub const MAX_SCALE: f64 = 5.0;
/// Scale change applied per wheel event.
pub const ZOOM_STEP: f64 = 0.1;

/// The view transform for the canvas: zoom scale, pan offset and the
/// device pixel ratio of the output.
///
/// Every pointer-derived coordinate must pass through [`Viewport::to_logical`]
/// before it reaches drawing logic; raw screen coordinates are only
/// valid while scale is 1 and the offset is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Current zoom scale, clamped to [`MIN_SCALE`]..=[`MAX_SCALE`].
    pub scale: f64,
    /// Pan offset in display pixels.
    pub offset: Vec2,
    /// Device pixel ratio of the backing raster.
    pub dpr: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            dpr: 1.0,
        }
    }
}

impl Viewport {
    /// Create a viewport for the given device pixel ratio.
    pub fn new(dpr: f64) -> Self {
        Self {
            dpr,
            ..Self::default()
        }
    }

    /// Map a screen point to logical drawing coordinates.
    pub fn to_logical(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset.x) / self.scale,
            (screen.y - self.offset.y) / self.scale,
        )
    }

    /// Map a logical point back to screen coordinates.
    pub fn to_screen(&self, logical: Point) -> Point {
        Point::new(
            logical.x * self.scale + self.offset.x,
            logical.y * self.scale + self.offset.y,
        )
    }

    /// Step the scale from a wheel delta: scrolling away zooms out,
    /// scrolling in zooms in, one step per event, clamped.
    pub fn zoom(&mut self, wheel_delta: f64) {
        let step = if wheel_delta > 0.0 { -ZOOM_STEP } else { ZOOM_STEP };
        self.set_scale(self.scale + step);
    }

    /// Set the scale directly, clamped to the allowed range.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Pan by a cumulative screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Reset to scale 1 and zero offset (dpr is a property of the
    /// output device and survives resets).
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mapping() {
        let vp = Viewport::default();
        let p = Point::new(120.0, 80.0);
        assert_eq!(vp.to_logical(p), p);
    }

    #[test]
    fn test_mapping_inverts_scale_and_offset() {
        let vp = Viewport {
            scale: 2.0,
            offset: Vec2::new(10.0, -20.0),
            dpr: 1.0,
        };
        let logical = vp.to_logical(Point::new(110.0, 80.0));
        assert!((logical.x - 50.0).abs() < f64::EPSILON);
        assert!((logical.y - 50.0).abs() < f64::EPSILON);

        let back = vp.to_screen(logical);
        assert!((back.x - 110.0).abs() < 1e-10);
        assert!((back.y - 80.0).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_direction() {
        let mut vp = Viewport::default();
        vp.zoom(-1.0); // wheel towards the user: zoom in
        assert!((vp.scale - 1.1).abs() < 1e-12);
        vp.zoom(1.0);
        assert!((vp.scale - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_clamps_at_bounds() {
        let mut vp = Viewport::default();
        for _ in 0..100 {
            vp.zoom(-1.0);
        }
        assert!((vp.scale - MAX_SCALE).abs() < 1e-12);

        for _ in 0..200 {
            vp.zoom(1.0);
        }
        assert!((vp.scale - MIN_SCALE).abs() < 1e-12);
    }

    #[test]
    fn test_pan_accumulates() {
        let mut vp = Viewport::default();
        vp.pan(Vec2::new(5.0, 10.0));
        vp.pan(Vec2::new(-2.0, 3.0));
        assert_eq!(vp.offset, Vec2::new(3.0, 13.0));
    }

    #[test]
    fn test_reset_keeps_dpr() {
        let mut vp = Viewport::new(2.0);
        vp.set_scale(3.0);
        vp.pan(Vec2::new(40.0, 40.0));
        vp.reset();
        assert_eq!(vp.scale, 1.0);
        assert_eq!(vp.offset, Vec2::ZERO);
        assert_eq!(vp.dpr, 2.0);
    }

    #[test]
    fn test_serde_roundtrip() {
        let vp = Viewport {
            scale: 1.4,
            offset: Vec2::new(12.0, -7.5),
            dpr: 2.0,
        };
        let json = serde_json::to_string(&vp).unwrap();
        let back: Viewport = serde_json::from_str(&json).unwrap();
        assert_eq!(vp, back);
    }
}
