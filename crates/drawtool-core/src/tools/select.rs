//! Selection tool.

use super::{ToolAction, ToolBehavior, ToolKind};
use crate::events::{EventKind, Subscription, SurfaceEvent};
use crate::shapes::ShapeId;
use crate::surface::Surface;
use kurbo::{Point, Rect};

/// Corner handle size on touch-capable input.
pub const TOUCH_CORNER_SIZE: f64 = 22.0;
/// Corner handle size for mouse input.
pub const MOUSE_CORNER_SIZE: f64 = 12.0;

/// Properties applied to an object when it becomes selected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionAffordances {
    pub corner_size: f64,
    pub transparent_corners: bool,
}

impl SelectionAffordances {
    pub fn for_input(touch_supported: bool) -> Self {
        Self {
            corner_size: if touch_supported {
                TOUCH_CORNER_SIZE
            } else {
                MOUSE_CORNER_SIZE
            },
            transparent_corners: false,
        }
    }
}

/// Picks objects by click or by rubber band.
#[derive(Debug, Clone)]
pub struct SelectionTool {
    affordances: SelectionAffordances,
    /// Press point of an in-progress rubber band.
    band_start: Option<Point>,
}

impl SelectionTool {
    pub fn new(touch_supported: bool) -> Self {
        Self {
            affordances: SelectionAffordances::for_input(touch_supported),
            band_start: None,
        }
    }

    pub fn affordances(&self) -> SelectionAffordances {
        self.affordances
    }

    fn set_selectable(surface: &mut Surface, selectable: bool) {
        surface.set_selection_enabled(selectable);
        surface.set_all_selectable(selectable);
    }

    fn mouse_down(&mut self, point: Point, surface: &mut Surface) -> Option<ToolAction> {
        if let Some(id) = surface.find_target(point) {
            self.band_start = None;
            if surface.select(id) {
                surface.render_all();
                return Some(ToolAction::Selected(vec![id]));
            }
            return None;
        }
        surface.clear_selection();
        if surface.selection_enabled() {
            self.band_start = Some(point);
        }
        surface.render_all();
        None
    }

    fn mouse_up(&mut self, point: Point, surface: &mut Surface) -> Option<ToolAction> {
        let start = self.band_start.take()?;
        if start == point {
            return None;
        }
        let candidates = surface.objects_in_rect(Rect::from_points(start, point));
        let selected = surface.select_many(&candidates);
        surface.render_all();
        (!selected.is_empty()).then_some(ToolAction::Selected(selected))
    }

    fn object_selected(&self, id: ShapeId, surface: &mut Surface) {
        if let Some(shape) = surface.get_mut(id) {
            let props = shape.props_mut();
            props.corner_size = self.affordances.corner_size;
            props.transparent_corners = self.affordances.transparent_corners;
        }
    }
}

impl ToolBehavior for SelectionTool {
    fn activate(&mut self, kind: ToolKind, surface: &mut Surface) -> Subscription {
        Self::set_selectable(surface, true);
        Subscription::attach(
            surface.listeners_mut(),
            kind,
            &[EventKind::MouseDown, EventKind::MouseUp, EventKind::ObjectSelected],
        )
    }

    fn deactivate(&mut self, surface: &mut Surface) {
        Self::set_selectable(surface, false);
        surface.clear_selection();
        self.band_start = None;
    }

    fn handle(&mut self, event: SurfaceEvent, surface: &mut Surface) -> Option<ToolAction> {
        match event {
            SurfaceEvent::MouseDown(p) => self.mouse_down(p, surface),
            SurfaceEvent::MouseUp(p) => self.mouse_up(p, surface),
            SurfaceEvent::ObjectSelected(id) => {
                self.object_selected(id, surface);
                None
            }
            SurfaceEvent::MouseMove(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, SerializableColor, Shape};
    use kurbo::Size;

    fn surface_with_two_rects() -> (Surface, ShapeId, ShapeId) {
        let mut surface = Surface::new(Size::new(700.0, 500.0));
        let mut a = Rectangle::new(Point::new(0.0, 0.0), 50.0, 50.0);
        a.style.fill_color = Some(SerializableColor::white());
        let mut b = Rectangle::new(Point::new(200.0, 200.0), 50.0, 50.0);
        b.style.fill_color = Some(SerializableColor::white());
        let a = surface.add(Shape::Rectangle(a));
        let b = surface.add(Shape::Rectangle(b));
        (surface, a, b)
    }

    #[test]
    fn test_activate_makes_everything_selectable() {
        let (mut surface, a, b) = surface_with_two_rects();
        let mut tool = SelectionTool::new(false);
        let subscription = tool.activate(ToolKind::Select, &mut surface);
        assert!(surface.selection_enabled());
        assert!(surface.get(a).unwrap().is_selectable());
        assert!(surface.get(b).unwrap().is_selectable());

        subscription.dispose(surface.listeners_mut());
        tool.deactivate(&mut surface);
        assert!(!surface.selection_enabled());
        assert!(!surface.get(a).unwrap().is_selectable());
    }

    #[test]
    fn test_click_selects_target() {
        let (mut surface, a, _) = surface_with_two_rects();
        let mut tool = SelectionTool::new(false);
        let _subscription = tool.activate(ToolKind::Select, &mut surface);
        let action = tool.handle(SurfaceEvent::MouseDown(Point::new(10.0, 10.0)), &mut surface);
        assert_eq!(action, Some(ToolAction::Selected(vec![a])));
        assert_eq!(surface.selection(), &[a]);
    }

    #[test]
    fn test_rubber_band_selects_intersecting() {
        let (mut surface, a, b) = surface_with_two_rects();
        let mut tool = SelectionTool::new(false);
        let _subscription = tool.activate(ToolKind::Select, &mut surface);
        tool.handle(SurfaceEvent::MouseDown(Point::new(-10.0, -10.0)), &mut surface);
        let action = tool.handle(SurfaceEvent::MouseUp(Point::new(300.0, 300.0)), &mut surface);
        assert_eq!(action, Some(ToolAction::Selected(vec![a, b])));
    }

    #[test]
    fn test_object_selected_applies_touch_affordances() {
        let (mut surface, a, _) = surface_with_two_rects();
        let mut tool = SelectionTool::new(true);
        tool.handle(SurfaceEvent::ObjectSelected(a), &mut surface);
        let props = surface.get(a).unwrap().props();
        assert!((props.corner_size - TOUCH_CORNER_SIZE).abs() < f64::EPSILON);
        assert!(!props.transparent_corners);
    }

    #[test]
    fn test_deactivate_clears_selection() {
        let (mut surface, a, _) = surface_with_two_rects();
        let mut tool = SelectionTool::new(false);
        let subscription = tool.activate(ToolKind::Select, &mut surface);
        assert!(surface.select(a));
        subscription.dispose(surface.listeners_mut());
        tool.deactivate(&mut surface);
        assert!(surface.selection().is_empty());
    }
}
