//! Drag-to-shape protocol shared by the line, rectangle, ellipse, square and
//! circle tools.

use super::{ToolAction, ToolBehavior, ToolKind};
use crate::events::{EventKind, Subscription, SurfaceEvent};
use crate::geometry::{distance, dominant_square, normalize_extent};
use crate::shapes::{Ellipse, Line, Rectangle, Shape, ShapeId};
use crate::surface::Surface;
use kurbo::{Point, Rect, Vec2};

/// Which shape a drag produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Line,
    Rectangle,
    Ellipse,
    Square,
    Circle,
}

impl ShapeKind {
    /// Signed extent of the shape for a drag from `start` to `end`.
    fn extent(self, start: Point, end: Point) -> Vec2 {
        let delta = end - start;
        match self {
            ShapeKind::Square | ShapeKind::Circle => dominant_square(delta),
            _ => delta,
        }
    }

    /// Shape used as live preview. Rectangles keep a signed size.
    fn preview(self, start: Point, end: Point) -> Shape {
        let extent = self.extent(start, end);
        match self {
            ShapeKind::Line => Shape::Line(Line::new(start, end)),
            ShapeKind::Rectangle | ShapeKind::Square => {
                Shape::Rectangle(Rectangle::new(start, extent.x, extent.y))
            }
            ShapeKind::Ellipse | ShapeKind::Circle => {
                Shape::Ellipse(Ellipse::from_rect(Rect::from_points(start, start + extent)))
            }
        }
    }

    /// Update a preview shape in place for a new pointer position.
    fn reshape(self, shape: &mut Shape, start: Point, end: Point) {
        let extent = self.extent(start, end);
        match shape {
            Shape::Line(line) => line.end = end,
            Shape::Rectangle(rect) => {
                rect.width = extent.x;
                rect.height = extent.y;
            }
            Shape::Ellipse(ellipse) => {
                ellipse.center = start + extent / 2.0;
                ellipse.radius_x = extent.x.abs() / 2.0;
                ellipse.radius_y = extent.y.abs() / 2.0;
            }
            Shape::Freehand(_) => {}
        }
    }

    /// Final shape for a completed drag, with non-negative extents.
    fn build(self, start: Point, end: Point) -> Shape {
        let extent = self.extent(start, end);
        match self {
            ShapeKind::Line => Shape::Line(Line::new(start, end)),
            ShapeKind::Rectangle | ShapeKind::Square => {
                Shape::Rectangle(Rectangle::from_extent(start, extent))
            }
            ShapeKind::Ellipse | ShapeKind::Circle => {
                Shape::Ellipse(Ellipse::from_rect(normalize_extent(start, extent)))
            }
        }
    }
}

/// State of a drag interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    /// Waiting for a pointer-down.
    #[default]
    Idle,
    /// Between pointer-down and pointer-up.
    Dragging {
        start: Point,
        current: Point,
        moved: bool,
        provisional: Option<ShapeId>,
    },
}

/// A tool that turns a pointer drag into a shape.
#[derive(Debug, Clone)]
pub struct ShapeTool {
    kind: ShapeKind,
    /// Releases closer than this to the press point count as clicks.
    min_drag_distance: f64,
    state: DragState,
}

impl ShapeTool {
    pub fn new(kind: ShapeKind, min_drag_distance: f64) -> Self {
        Self {
            kind,
            min_drag_distance,
            state: DragState::Idle,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Drop the current drag session and its preview, if any.
    fn abandon(&mut self, surface: &mut Surface) {
        if let DragState::Dragging {
            provisional: Some(id),
            ..
        } = std::mem::take(&mut self.state)
        {
            surface.remove(id);
        }
    }

    fn mouse_down(&mut self, point: Point, surface: &mut Surface) {
        // A drag abandoned when the pointer left the surface never saw its
        // pointer-up; clear it before starting over.
        if self.is_dragging() {
            log::debug!("Discarding stale drag session");
            self.abandon(surface);
        }

        let mut preview = self.kind.preview(point, point);
        *preview.style_mut() = surface.style().clone();
        let props = preview.props_mut();
        props.selectable = false;
        props.provisional = true;
        let id = surface.add(preview);

        self.state = DragState::Dragging {
            start: point,
            current: point,
            moved: false,
            provisional: Some(id),
        };
    }

    fn mouse_move(&mut self, point: Point, surface: &mut Surface) {
        let DragState::Dragging {
            start,
            current,
            moved,
            provisional,
        } = &mut self.state
        else {
            return;
        };
        *current = point;
        *moved = true;
        if let Some(shape) = provisional.and_then(|id| surface.get_mut(id)) {
            self.kind.reshape(shape, *start, point);
        }
        surface.render_all();
    }

    fn mouse_up(&mut self, point: Point, surface: &mut Surface) -> Option<ToolAction> {
        let DragState::Dragging {
            start,
            moved,
            provisional,
            ..
        } = std::mem::take(&mut self.state)
        else {
            return None;
        };
        if let Some(id) = provisional {
            surface.remove(id);
        }

        if moved && distance(start, point) > self.min_drag_distance {
            let mut shape = self.kind.build(start, point);
            *shape.style_mut() = surface.style().clone();
            shape.props_mut().selectable = false;
            let id = surface.add(shape);
            log::debug!("Committed {:?} {}", self.kind, id);
            surface.render_all();
            None
        } else {
            surface.render_all();
            Some(ToolAction::ChooseTool(ToolKind::Select))
        }
    }
}

impl ToolBehavior for ShapeTool {
    fn activate(&mut self, kind: ToolKind, surface: &mut Surface) -> Subscription {
        surface.set_selection_enabled(false);
        surface.set_all_selectable(false);
        Subscription::attach(
            surface.listeners_mut(),
            kind,
            &[EventKind::MouseDown, EventKind::MouseMove, EventKind::MouseUp],
        )
    }

    fn deactivate(&mut self, surface: &mut Surface) {
        self.abandon(surface);
    }

    fn handle(&mut self, event: SurfaceEvent, surface: &mut Surface) -> Option<ToolAction> {
        match event {
            SurfaceEvent::MouseDown(p) => {
                self.mouse_down(p, surface);
                None
            }
            SurfaceEvent::MouseMove(p) => {
                self.mouse_move(p, surface);
                None
            }
            SurfaceEvent::MouseUp(p) => self.mouse_up(p, surface),
            SurfaceEvent::ObjectSelected(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn drag(tool: &mut ShapeTool, surface: &mut Surface, from: Point, to: Point) -> Option<ToolAction> {
        tool.handle(SurfaceEvent::MouseDown(from), surface);
        tool.handle(SurfaceEvent::MouseMove(to), surface);
        tool.handle(SurfaceEvent::MouseUp(to), surface)
    }

    fn only_shape(surface: &Surface) -> &Shape {
        assert_eq!(surface.len(), 1);
        &surface.objects()[0]
    }

    #[test]
    fn test_preview_follows_pointer() {
        let mut surface = Surface::new(Size::new(700.0, 500.0));
        let mut tool = ShapeTool::new(ShapeKind::Rectangle, 3.0);
        tool.handle(SurfaceEvent::MouseDown(Point::new(10.0, 10.0)), &mut surface);
        assert!(only_shape(&surface).is_provisional());

        tool.handle(SurfaceEvent::MouseMove(Point::new(50.0, 30.0)), &mut surface);
        let Shape::Rectangle(rect) = only_shape(&surface) else {
            panic!("expected rectangle preview");
        };
        assert!((rect.width - 40.0).abs() < f64::EPSILON);
        assert!((rect.height - 20.0).abs() < f64::EPSILON);
        assert!(!rect.props.selectable);
    }

    #[test]
    fn test_square_uses_dominant_axis() {
        let mut surface = Surface::new(Size::new(700.0, 500.0));
        let mut tool = ShapeTool::new(ShapeKind::Square, 3.0);
        assert!(drag(&mut tool, &mut surface, Point::new(100.0, 100.0), Point::new(60.0, 130.0)).is_none());
        let Shape::Rectangle(rect) = only_shape(&surface) else {
            panic!("expected square");
        };
        assert!((rect.width - 40.0).abs() < f64::EPSILON);
        assert!((rect.height - 40.0).abs() < f64::EPSILON);
        assert!((rect.position.x - 60.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ellipse_radii_are_half_the_deltas() {
        let mut surface = Surface::new(Size::new(700.0, 500.0));
        let mut tool = ShapeTool::new(ShapeKind::Ellipse, 3.0);
        drag(&mut tool, &mut surface, Point::new(100.0, 100.0), Point::new(20.0, 140.0));
        let Shape::Ellipse(ellipse) = only_shape(&surface) else {
            panic!("expected ellipse");
        };
        assert!((ellipse.radius_x - 40.0).abs() < f64::EPSILON);
        assert!((ellipse.radius_y - 20.0).abs() < f64::EPSILON);
        assert!((ellipse.center.x - 60.0).abs() < f64::EPSILON);
        assert!((ellipse.center.y - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_circle_has_equal_radii() {
        let mut surface = Surface::new(Size::new(700.0, 500.0));
        let mut tool = ShapeTool::new(ShapeKind::Circle, 3.0);
        drag(&mut tool, &mut surface, Point::new(0.0, 0.0), Point::new(30.0, 10.0));
        let Shape::Ellipse(ellipse) = only_shape(&surface) else {
            panic!("expected circle");
        };
        assert!(ellipse.is_circle());
        assert!((ellipse.radius_x - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_short_drag_is_a_click() {
        let mut surface = Surface::new(Size::new(700.0, 500.0));
        let mut tool = ShapeTool::new(ShapeKind::Line, 3.0);
        let action = drag(&mut tool, &mut surface, Point::new(10.0, 10.0), Point::new(12.0, 11.0));
        assert_eq!(action, Some(ToolAction::ChooseTool(ToolKind::Select)));
        assert!(surface.is_empty());
        assert_eq!(tool.state(), &DragState::Idle);
    }

    #[test]
    fn test_stale_session_is_reset_on_pointer_down() {
        let mut surface = Surface::new(Size::new(700.0, 500.0));
        let mut tool = ShapeTool::new(ShapeKind::Rectangle, 3.0);
        tool.handle(SurfaceEvent::MouseDown(Point::new(0.0, 0.0)), &mut surface);
        tool.handle(SurfaceEvent::MouseMove(Point::new(40.0, 40.0)), &mut surface);
        // Pointer left the surface; the next press starts fresh.
        tool.handle(SurfaceEvent::MouseDown(Point::new(200.0, 200.0)), &mut surface);
        assert_eq!(surface.len(), 1);
        assert!(only_shape(&surface).is_provisional());
        tool.handle(SurfaceEvent::MouseUp(Point::new(200.0, 200.0)), &mut surface);
        assert!(surface.is_empty());
    }

    #[test]
    fn test_deactivate_drops_preview() {
        let mut surface = Surface::new(Size::new(700.0, 500.0));
        let mut tool = ShapeTool::new(ShapeKind::Line, 3.0);
        tool.handle(SurfaceEvent::MouseDown(Point::new(0.0, 0.0)), &mut surface);
        tool.deactivate(&mut surface);
        assert!(surface.is_empty());
        assert!(!tool.is_dragging());
    }

    #[test]
    fn test_committed_shape_takes_current_style() {
        let mut surface = Surface::new(Size::new(700.0, 500.0));
        surface.style_mut().stroke_width = 7.0;
        let mut tool = ShapeTool::new(ShapeKind::Line, 3.0);
        drag(&mut tool, &mut surface, Point::new(0.0, 0.0), Point::new(50.0, 0.0));
        let shape = only_shape(&surface);
        assert!((shape.style().stroke_width - 7.0).abs() < f64::EPSILON);
        assert!(!shape.is_provisional());
        assert!(!shape.is_selectable());
    }
}
