//! Free drawing with the brush.

use super::{ToolAction, ToolBehavior, ToolKind};
use crate::events::{EventKind, Subscription, SurfaceEvent};
use crate::shapes::{Freehand, Shape, ShapeStyle};
use crate::surface::Surface;
use kurbo::Point;

/// Paints freehand paths with the surface brush.
#[derive(Debug, Clone, Default)]
pub struct FreeDrawTool {
    /// Points of the stroke in progress; empty when not drawing.
    points: Vec<Point>,
}

impl FreeDrawTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawing(&self) -> bool {
        !self.points.is_empty()
    }

    fn push(&mut self, point: Point) {
        if self.points.last() != Some(&point) {
            self.points.push(point);
        }
    }

    fn finish(&mut self, surface: &mut Surface) {
        let points = std::mem::take(&mut self.points);
        if points.len() < 2 {
            return;
        }
        let brush = surface.brush();
        let mut path = Freehand::from_points(points);
        path.style = ShapeStyle {
            stroke_color: brush.color,
            stroke_width: brush.width,
            fill_color: None,
        };
        let id = surface.add(Shape::Freehand(path));
        log::debug!("Committed freehand path {}", id);
        surface.render_all();
    }
}

impl ToolBehavior for FreeDrawTool {
    fn activate(&mut self, kind: ToolKind, surface: &mut Surface) -> Subscription {
        surface.set_selection_enabled(false);
        surface.set_all_selectable(false);
        surface.set_drawing_mode(true);
        Subscription::attach(
            surface.listeners_mut(),
            kind,
            &[EventKind::MouseDown, EventKind::MouseMove, EventKind::MouseUp],
        )
    }

    fn deactivate(&mut self, surface: &mut Surface) {
        surface.set_drawing_mode(false);
        self.points.clear();
    }

    fn handle(&mut self, event: SurfaceEvent, surface: &mut Surface) -> Option<ToolAction> {
        match event {
            SurfaceEvent::MouseDown(p) => {
                self.points.clear();
                self.points.push(p);
            }
            SurfaceEvent::MouseMove(p) if self.is_drawing() => {
                self.push(p);
                surface.render_all();
            }
            SurfaceEvent::MouseUp(p) if self.is_drawing() => {
                self.push(p);
                self.finish(surface);
            }
            _ => {}
        }
        None
    }
}
