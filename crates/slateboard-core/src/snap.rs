//! Snap functionality for shape drags: 8-direction angle snapping,
//! square aspect locking, and grid cell generation.

use kurbo::{Point, Rect};

/// The fixed set of snappable line angles, in degrees. Ties between two
/// candidates keep the earlier entry.
pub const SNAP_ANGLES: [f64; 9] = [0.0, 45.0, 90.0, 135.0, 180.0, -45.0, -90.0, -135.0, -180.0];

/// Minimum number of grid columns.
pub const MIN_GRID_COLS: u32 = 2;
/// Maximum number of grid columns.
pub const MAX_GRID_COLS: u32 = 10;

/// Snap an angle to the nearest entry of [`SNAP_ANGLES`].
pub fn snap_angle(angle_degrees: f64) -> f64 {
    SNAP_ANGLES
        .into_iter()
        .reduce(|prev, curr| {
            if (curr - angle_degrees).abs() < (prev - angle_degrees).abs() {
                curr
            } else {
                prev
            }
        })
        .unwrap_or(0.0)
}

/// Endpoint at `length` from `origin` along a snapped angle.
pub fn snapped_endpoint(origin: Point, length: f64, angle_degrees: f64) -> Point {
    let rad = angle_degrees.to_radians();
    Point::new(
        origin.x + rad.cos() * length,
        origin.y + rad.sin() * length,
    )
}

/// Constrain a rectangle/circle drag to a square bounding box: the
/// shorter axis wins, each axis keeps its own direction.
pub fn aspect_lock(origin: Point, free: Point) -> Point {
    let dx = free.x - origin.x;
    let dy = free.y - origin.y;
    let size = dx.abs().min(dy.abs());
    Point::new(
        origin.x + sign(dx) * size,
        origin.y + sign(dy) * size,
    )
}

/// One row of `cols` equal-width cells spanning the box from `origin`
/// to `end`. `cols` is clamped to the supported range; cells may carry
/// negative extents when the drag runs towards the upper-left.
pub fn grid_rects(origin: Point, end: Point, cols: u32) -> Vec<Rect> {
    let cols = cols.clamp(MIN_GRID_COLS, MAX_GRID_COLS);
    let cell_width = (end.x - origin.x) / cols as f64;
    let cell_height = end.y - origin.y;

    (0..cols)
        .map(|c| {
            let x = origin.x + c as f64 * cell_width;
            Rect::new(x, origin.y, x + cell_width, origin.y + cell_height)
        })
        .collect()
}

// Math.sign semantics: zero stays zero.
fn sign(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v.signum() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_angle_nearest() {
        assert_eq!(snap_angle(100.0), 90.0);
        assert_eq!(snap_angle(-10.0), 0.0);
        assert_eq!(snap_angle(170.0), 180.0);
        assert_eq!(snap_angle(-100.0), -90.0);
        assert_eq!(snap_angle(44.0), 45.0);
    }

    #[test]
    fn test_snap_angle_tie_keeps_earlier_entry() {
        // 22.5 is equidistant from 0 and 45; 0 comes first.
        assert_eq!(snap_angle(22.5), 0.0);
        // -22.5 is equidistant from 0 and -45; 0 comes first.
        assert_eq!(snap_angle(-22.5), 0.0);
    }

    #[test]
    fn test_snapped_endpoint_horizontal() {
        let p = snapped_endpoint(Point::new(10.0, 20.0), 50.0, 0.0);
        assert!((p.x - 60.0).abs() < 1e-9);
        assert!((p.y - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapped_endpoint_diagonal() {
        let len = 2.0_f64.sqrt();
        let p = snapped_endpoint(Point::ZERO, len, 45.0);
        assert!((p.x - 1.0).abs() < 1e-9);
        assert!((p.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_aspect_lock_min_magnitude_keeps_signs() {
        let p = aspect_lock(Point::ZERO, Point::new(30.0, -50.0));
        assert_eq!(p, Point::new(30.0, -30.0));

        let p = aspect_lock(Point::new(10.0, 10.0), Point::new(-40.0, 30.0));
        assert_eq!(p, Point::new(-10.0, 30.0));
    }

    #[test]
    fn test_aspect_lock_zero_axis() {
        let p = aspect_lock(Point::ZERO, Point::new(0.0, 40.0));
        assert_eq!(p, Point::ZERO);
    }

    #[test]
    fn test_grid_rects_equal_cells() {
        let rects = grid_rects(Point::ZERO, Point::new(100.0, 50.0), 4);
        assert_eq!(rects.len(), 4);
        for (i, r) in rects.iter().enumerate() {
            assert!((r.x0 - i as f64 * 25.0).abs() < 1e-9);
            assert!(((r.x1 - r.x0) - 25.0).abs() < 1e-9);
            assert!(((r.y1 - r.y0) - 50.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_grid_cols_clamped() {
        assert_eq!(grid_rects(Point::ZERO, Point::new(10.0, 10.0), 1).len(), 2);
        assert_eq!(grid_rects(Point::ZERO, Point::new(10.0, 10.0), 25).len(), 10);
    }

    #[test]
    fn test_grid_negative_extent() {
        let rects = grid_rects(Point::new(100.0, 50.0), Point::ZERO, 2);
        assert_eq!(rects.len(), 2);
        assert!((rects[0].x0 - 100.0).abs() < 1e-9);
        assert!(((rects[0].x1 - rects[0].x0) + 50.0).abs() < 1e-9);
    }
}
