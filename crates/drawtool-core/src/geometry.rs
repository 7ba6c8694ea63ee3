//! Elementary 2D helpers used by the shape tools.

use kurbo::{Point, Rect, Vec2};

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Turn an origin plus a possibly negative size into a rectangle with
/// non-negative extents.
///
/// A negative width moves the origin left by that amount and flips the sign,
/// and likewise for height.
pub fn normalize_extent(origin: Point, size: Vec2) -> Rect {
    let (x, width) = if size.x < 0.0 {
        (origin.x + size.x, -size.x)
    } else {
        (origin.x, size.x)
    };
    let (y, height) = if size.y < 0.0 {
        (origin.y + size.y, -size.y)
    } else {
        (origin.y, size.y)
    };
    Rect::new(x, y, x + width, y + height)
}

/// Force a drag delta onto a square using the dominant axis.
///
/// Both components take the larger magnitude and keep their own sign. When
/// the magnitudes tie the horizontal axis wins; a zero component counts as
/// positive.
pub fn dominant_square(delta: Vec2) -> Vec2 {
    let side = if delta.x.abs() >= delta.y.abs() {
        delta.x.abs()
    } else {
        delta.y.abs()
    };
    Vec2::new(side.copysign(signum_or_positive(delta.x)), side.copysign(signum_or_positive(delta.y)))
}

fn signum_or_positive(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}
