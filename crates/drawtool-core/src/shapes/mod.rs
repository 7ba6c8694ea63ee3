//! Shape definitions for the drawing surface.

mod color;
mod ellipse;
mod freehand;
mod line;
mod rectangle;

pub use color::{SerializableColor, parse_css_color};
pub use ellipse::Ellipse;
pub use freehand::Freehand;
pub use line::Line;
pub use rectangle::Rectangle;

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Style properties for shapes.
///
/// The surface keeps one of these as the current drawing style and hands a
/// clone to every shape it creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color (None = no stroke).
    pub stroke_color: Option<SerializableColor>,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: Some(SerializableColor::black()),
            stroke_width: 2.0,
            fill_color: None,
        }
    }
}

/// Per-object properties that are not geometry or style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectProps {
    /// Whether the object can be picked by the selection tool.
    pub selectable: bool,
    /// Size of the corner handles drawn around the selected object.
    pub corner_size: f64,
    /// Whether corner handles are drawn hollow.
    pub transparent_corners: bool,
    /// Live preview of an in-progress drag. Never persisted.
    #[serde(skip)]
    pub provisional: bool,
}

impl Default for ObjectProps {
    fn default() -> Self {
        Self {
            selectable: false,
            corner_size: 12.0,
            transparent_corners: false,
            provisional: false,
        }
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => point_to_segment_dist(point, *only, *only),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Scale `point` away from `anchor`.
pub(crate) fn scale_about(point: Point, anchor: Point, sx: f64, sy: f64) -> Point {
    Point::new(
        anchor.x + (point.x - anchor.x) * sx,
        anchor.y + (point.y - anchor.y) * sy,
    )
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box with non-negative extents.
    fn bounds(&self) -> Rect;

    /// Check if a point hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Get the object properties.
    fn props(&self) -> &ObjectProps;

    /// Get mutable object properties.
    fn props_mut(&mut self) -> &mut ObjectProps;

    /// Change the geometry's size by the given factors, keeping the top-left
    /// corner of the bounds fixed. Stroke width is not touched.
    fn resize(&mut self, sx: f64, sy: f64);
}

/// Enum wrapper for all shape types (for serialization).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Line(Line),
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Freehand(Freehand),
}

impl Shape {
    fn as_trait(&self) -> &dyn ShapeTrait {
        match self {
            Shape::Line(s) => s,
            Shape::Rectangle(s) => s,
            Shape::Ellipse(s) => s,
            Shape::Freehand(s) => s,
        }
    }

    fn as_trait_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            Shape::Line(s) => s,
            Shape::Rectangle(s) => s,
            Shape::Ellipse(s) => s,
            Shape::Freehand(s) => s,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.as_trait().id()
    }

    pub fn bounds(&self) -> Rect {
        self.as_trait().bounds()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.as_trait().hit_test(point, tolerance)
    }

    pub fn style(&self) -> &ShapeStyle {
        self.as_trait().style()
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        self.as_trait_mut().style_mut()
    }

    pub fn props(&self) -> &ObjectProps {
        self.as_trait().props()
    }

    pub fn props_mut(&mut self) -> &mut ObjectProps {
        self.as_trait_mut().props_mut()
    }

    pub fn resize(&mut self, sx: f64, sy: f64) {
        self.as_trait_mut().resize(sx, sy)
    }

    /// Short type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Line(_) => "line",
            Shape::Rectangle(_) => "rect",
            Shape::Ellipse(_) => "ellipse",
            Shape::Freehand(_) => "path",
        }
    }

    pub fn is_selectable(&self) -> bool {
        self.props().selectable
    }

    pub fn is_provisional(&self) -> bool {
        self.props().provisional
    }

    /// Test if this shape intersects a selection rectangle.
    /// Lines and freehand paths test their segments, other shapes their bounds.
    pub fn intersects_rect(&self, rect: Rect) -> bool {
        match self {
            Shape::Line(s) => polyline_intersects_rect(&[s.start, s.end], rect),
            Shape::Freehand(s) => polyline_intersects_rect(&s.points, rect),
            _ => rect.intersect(self.bounds().inflate(1.0, 1.0)).area() > 0.0,
        }
    }
}

/// Test if any segment of a polyline crosses or lies inside a rectangle.
fn polyline_intersects_rect(points: &[Point], rect: Rect) -> bool {
    if points.iter().any(|p| rect.contains(*p)) {
        return true;
    }
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    points.windows(2).any(|w| {
        (0..4).any(|i| segments_intersect(w[0], w[1], corners[i], corners[(i + 1) % 4]))
    })
}

/// Test if two line segments (a-b) and (c-d) properly cross.
fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let cross = |o: Point, p: Point, q: Point| -> f64 {
        (p.x - o.x) * (q.y - o.y) - (p.y - o.y) * (q.x - o.x)
    };
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}
