//! Freehand path drawn with the brush.

use super::{ObjectProps, ShapeId, ShapeStyle, ShapeTrait, point_to_polyline_dist, scale_about};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand drawing (series of points).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Freehand {
    pub(crate) id: ShapeId,
    /// Points in the freehand path.
    pub points: Vec<Point>,
    /// Style properties.
    pub style: ShapeStyle,
    #[serde(default)]
    pub props: ObjectProps,
}

impl Freehand {
    /// Create from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            style: ShapeStyle::default(),
            props: ObjectProps::default(),
        }
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl ShapeTrait for Freehand {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_polyline_dist(point, &self.points) <= tolerance + self.style.stroke_width / 2.0
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn props(&self) -> &ObjectProps {
        &self.props
    }

    fn props_mut(&mut self) -> &mut ObjectProps {
        &mut self.props
    }

    fn resize(&mut self, sx: f64, sy: f64) {
        let anchor = self.bounds().origin();
        for p in &mut self.points {
            *p = scale_about(*p, anchor, sx, sy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag() -> Freehand {
        Freehand::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 20.0),
            Point::new(20.0, 0.0),
        ])
    }

    #[test]
    fn test_bounds() {
        let bounds = zigzag().bounds();
        assert!((bounds.x1 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_bounds() {
        let path = Freehand::from_points(Vec::new());
        assert!(path.is_empty());
        assert_eq!(path.bounds(), Rect::ZERO);
    }

    #[test]
    fn test_hit_test_near_segment() {
        let path = zigzag();
        assert!(path.hit_test(Point::new(5.0, 10.0), 1.0));
        assert!(!path.hit_test(Point::new(10.0, 0.0), 1.0));
    }
}
