//! Pure 2D geometry helpers.
//!
//! No state, no side effects. Every shadow computation and the page-rect
//! corner setup go through these two functions.

use crate::types::Point;

/// Rotate `point` about `pivot` by `angle` radians (counter-clockwise in a
/// y-down coordinate system follows the usual sign convention of the
/// caller; this function is sign-agnostic).
pub fn rotate_point(point: Point, pivot: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    let dx = point.x - pivot.x;
    let dy = point.y - pivot.y;
    Point {
        x: pivot.x + dx * cos - dy * sin,
        y: pivot.y + dx * sin + dy * cos,
    }
}

/// Corner polygon of a `width` × `height` rectangle anchored at the
/// origin: top-left, top-right, bottom-right, bottom-left.
pub fn rect_points(width: f64, height: f64) -> [Point; 4] {
    [
        Point::new(0.0, 0.0),
        Point::new(width, 0.0),
        Point::new(width, height),
        Point::new(0.0, height),
    ]
}
