//! Grid snapping.

use kurbo::Point;

/// Default grid spacing in scene units.
pub const DEFAULT_GRID_SIZE: u32 = 25;

/// Round each coordinate to the nearest multiple of `grid_size`.
///
/// A non-positive grid leaves the point untouched.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    if grid_size <= 0.0 || !grid_size.is_finite() {
        return point;
    }
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}
