//! Live preview overlay for shape drags and text entry.
//!
//! The preview owns its own surface, stacked above the committed
//! raster by the shell. Each pointer move wipes it and repaints the
//! single in-progress shape; commit paints the identical geometry onto
//! the committed raster and wipes the overlay. Both paths go through
//! [`ShapePreview::paint`] so the committed result matches the last
//! preview frame exactly.

use crate::snap::{aspect_lock, grid_rects, snap_angle, snapped_endpoint};
use crate::text::TextEditor;
use crate::tools::ShapeKind;
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size};
use peniko::Color;
use slateboard_raster::{Surface, TextRasterizer};

/// Caret geometry: 1 logical px wide, offset one px past the run.
const CARET_WIDTH: f64 = 1.0;
const CARET_GAP: f64 = 1.0;

/// An in-progress shape drag in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapePreview {
    pub kind: ShapeKind,
    pub anchor: Point,
    pub end: Point,
    /// Shift held: snap lines to 45-degree steps, lock rectangles and
    /// circles square. Grids ignore it.
    pub snap: bool,
    pub grid_cols: u32,
}

impl ShapePreview {
    /// The drag endpoint after snapping is applied.
    pub fn resolved_end(&self) -> Point {
        if !self.snap {
            return self.end;
        }
        match self.kind {
            ShapeKind::Rectangle | ShapeKind::Circle => aspect_lock(self.anchor, self.end),
            ShapeKind::Line => {
                let dx = self.end.x - self.anchor.x;
                let dy = self.end.y - self.anchor.y;
                let angle = snap_angle(dy.atan2(dx).to_degrees());
                snapped_endpoint(self.anchor, dx.hypot(dy), angle)
            }
            ShapeKind::Grid => self.end,
        }
    }

    /// Paint the shape onto a surface. Shared by the preview overlay
    /// and the final commit.
    pub fn paint(&self, surface: &mut Surface, width: f64, color: Color) {
        let end = self.resolved_end();
        match self.kind {
            ShapeKind::Rectangle => {
                surface.stroke_rect(
                    Rect::new(self.anchor.x, self.anchor.y, end.x, end.y),
                    width,
                    color,
                );
            }
            ShapeKind::Circle => {
                let radius = self.anchor.distance(end);
                surface.stroke_circle(self.anchor, radius, width, color);
            }
            ShapeKind::Line => {
                surface.stroke_segment(self.anchor, end, width, color);
            }
            ShapeKind::Grid => {
                for cell in grid_rects(self.anchor, end, self.grid_cols) {
                    surface.stroke_rect(cell, width, color);
                }
            }
        }
    }
}

/// The overlay surface and its repaint entry points.
#[derive(Debug)]
pub struct PreviewLayer {
    surface: Surface,
}

impl PreviewLayer {
    pub fn new(display: Size, dpr: f64) -> Self {
        Self {
            surface: Surface::new(display, dpr),
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Wipe the overlay. Called on commit, cancel and tool switches.
    pub fn clear(&mut self) {
        self.surface.clear_device();
    }

    pub fn resize(&mut self, display: Size, dpr: f64) {
        self.surface.resize(display, dpr);
    }

    /// Repaint the overlay with a single in-progress shape.
    pub fn repaint_shape(
        &mut self,
        viewport: &Viewport,
        shape: &ShapePreview,
        width: f64,
        color: Color,
    ) {
        self.surface.clear_device();
        self.surface.set_transform(viewport.scale, viewport.offset);
        shape.paint(&mut self.surface, width, color);
    }

    /// Repaint the overlay with the pending text buffer and, when in
    /// the visible blink phase, the caret bar just past it.
    pub fn repaint_text(
        &mut self,
        viewport: &Viewport,
        editor: &TextEditor,
        rasterizer: &TextRasterizer,
        color: Color,
    ) {
        self.surface.clear_device();
        self.surface.set_transform(viewport.scale, viewport.offset);

        let caret = editor.caret();
        let style = editor.style();
        if !editor.is_empty() {
            self.surface
                .fill_text(rasterizer, editor.buffer(), caret, style, color);
        }
        if editor.caret_visible() {
            let advance = rasterizer.measure(editor.buffer(), style.size);
            let x = caret.x + advance + CARET_GAP;
            self.surface.stroke_segment(
                Point::new(x, caret.y),
                Point::new(x, caret.y + style.size),
                CARET_WIDTH,
                color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slateboard_raster::TextStyle;

    fn layer() -> PreviewLayer {
        PreviewLayer::new(Size::new(64.0, 64.0), 1.0)
    }

    fn drag(kind: ShapeKind, end: Point, snap: bool) -> ShapePreview {
        ShapePreview {
            kind,
            anchor: Point::new(10.0, 10.0),
            end,
            snap,
            grid_cols: 3,
        }
    }

    #[test]
    fn test_snap_squares_rectangle() {
        let shape = drag(ShapeKind::Rectangle, Point::new(40.0, 20.0), true);
        assert_eq!(shape.resolved_end(), Point::new(20.0, 20.0));
    }

    #[test]
    fn test_no_snap_keeps_free_end() {
        let shape = drag(ShapeKind::Rectangle, Point::new(40.0, 20.0), false);
        assert_eq!(shape.resolved_end(), Point::new(40.0, 20.0));
    }

    #[test]
    fn test_snap_straightens_near_horizontal_line() {
        let shape = drag(ShapeKind::Line, Point::new(50.0, 13.0), true);
        let end = shape.resolved_end();
        // Angle rounds to 0 degrees; length is preserved.
        assert!((end.y - 10.0).abs() < 1e-9);
        let len = 40.0_f64.hypot(3.0);
        assert!((end.x - (10.0 + len)).abs() < 1e-9);
    }

    #[test]
    fn test_grid_ignores_snap() {
        let shape = drag(ShapeKind::Grid, Point::new(40.0, 20.0), true);
        assert_eq!(shape.resolved_end(), Point::new(40.0, 20.0));
    }

    #[test]
    fn test_repaint_replaces_previous_frame() {
        let mut layer = layer();
        let vp = Viewport::default();

        let first = drag(ShapeKind::Line, Point::new(50.0, 10.0), false);
        layer.repaint_shape(&vp, &first, 3.0, Color::BLACK);
        assert!(!layer.surface().is_blank());

        // Second frame paints elsewhere; the first frame's pixels must
        // be gone, not layered under.
        let second = ShapePreview {
            anchor: Point::new(10.0, 50.0),
            end: Point::new(50.0, 50.0),
            ..first
        };
        layer.repaint_shape(&vp, &second, 3.0, Color::BLACK);
        let px = layer.surface().pixels().get_pixel(30, 10);
        assert_eq!(px.0[3], 0);
        let px = layer.surface().pixels().get_pixel(30, 50);
        assert!(px.0[3] > 0);
    }

    #[test]
    fn test_clear_wipes_overlay() {
        let mut layer = layer();
        let vp = Viewport::default();
        layer.repaint_shape(
            &vp,
            &drag(ShapeKind::Circle, Point::new(30.0, 30.0), false),
            3.0,
            Color::BLACK,
        );
        layer.clear();
        assert!(layer.surface().is_blank());
    }

    #[test]
    fn test_caret_painted_only_when_visible() {
        let mut layer = layer();
        let vp = Viewport::default();
        let rasterizer = TextRasterizer::new();
        let mut editor = TextEditor::new(Point::new(5.0, 5.0), TextStyle::default());

        layer.repaint_text(&vp, &editor, &rasterizer, Color::BLACK);
        assert!(!layer.surface().is_blank());

        // Advance half a blink cycle: caret hides, empty buffer means a
        // fully blank overlay.
        editor.tick(crate::text::BLINK_INTERVAL);
        layer.repaint_text(&vp, &editor, &rasterizer, Color::BLACK);
        assert!(layer.surface().is_blank());
    }
}
