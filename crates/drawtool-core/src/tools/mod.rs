//! Tool system for the drawing widget.
//!
//! Every toolbar entry is a [`Tool`]: an identity plus one of a closed set of
//! behaviors. Activation attaches listeners on the surface and hands back a
//! [`Subscription`]; deactivation disposes it.

mod delete;
mod free_draw;
mod select;
mod shape;

pub use delete::DeleteTool;
pub use free_draw::FreeDrawTool;
pub use select::{SelectionTool, SelectionAffordances};
pub use shape::{DragState, ShapeKind, ShapeTool};

use crate::events::{Subscription, SurfaceEvent};
use crate::shapes::ShapeId;
use crate::surface::Surface;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Line,
    Rectangle,
    Ellipse,
    Square,
    Circle,
    FreeDraw,
    Delete,
}

impl ToolKind {
    /// Every tool, in toolbar order.
    pub const ALL: [ToolKind; 8] = [
        ToolKind::Select,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
        ToolKind::Square,
        ToolKind::Circle,
        ToolKind::FreeDraw,
        ToolKind::Delete,
    ];

    /// Toolbar selector key.
    pub fn selector(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Line => "line",
            ToolKind::Rectangle => "rect",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Square => "square",
            ToolKind::Circle => "circle",
            ToolKind::FreeDraw => "free",
            ToolKind::Delete => "trash",
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "Selection Tool",
            ToolKind::Line => "Line Tool",
            ToolKind::Rectangle => "Rectangle Tool",
            ToolKind::Ellipse => "Ellipse Tool",
            ToolKind::Square => "Square Tool",
            ToolKind::Circle => "Circle Tool",
            ToolKind::FreeDraw => "Free Draw Tool",
            ToolKind::Delete => "Delete Tool",
        }
    }

    /// Look a tool up by its selector key.
    pub fn from_selector(selector: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.selector() == selector)
    }

    /// Single-use tools act immediately instead of becoming current.
    pub fn is_single_use(self) -> bool {
        matches!(self, ToolKind::Delete)
    }

    /// The shape this tool draws, if it is a drag-to-shape tool.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Ellipse => Some(ShapeKind::Ellipse),
            ToolKind::Square => Some(ShapeKind::Square),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Select | ToolKind::FreeDraw | ToolKind::Delete => None,
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Follow-up work a handler asks the registry to perform once event
/// dispatch has finished.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    /// Switch to another tool.
    ChooseTool(ToolKind),
    /// Objects became selected; deliver `ObjectSelected` for each.
    Selected(Vec<ShapeId>),
}

/// Capabilities shared by every tool behavior.
pub trait ToolBehavior {
    /// Attach listeners and apply mode-specific surface settings.
    fn activate(&mut self, kind: ToolKind, surface: &mut Surface) -> Subscription;

    /// Undo every side effect of `activate` other than listener attachment,
    /// which the returned subscription covers. Safe to call repeatedly.
    fn deactivate(&mut self, surface: &mut Surface);

    /// Called when the tool is chosen while already current.
    fn activate_again(&mut self, _surface: &mut Surface) {}

    /// Perform a single-use action.
    fn use_once(&mut self, _surface: &mut Surface) {}

    /// Handle an event delivered through one of this tool's listeners.
    fn handle(&mut self, _event: SurfaceEvent, _surface: &mut Surface) -> Option<ToolAction> {
        None
    }
}

/// The concrete behavior behind a tool.
#[derive(Debug, Clone)]
pub enum ToolVariant {
    Select(SelectionTool),
    Shape(ShapeTool),
    FreeDraw(FreeDrawTool),
    Delete(DeleteTool),
}

impl ToolVariant {
    fn behavior(&mut self) -> &mut dyn ToolBehavior {
        match self {
            ToolVariant::Select(t) => t,
            ToolVariant::Shape(t) => t,
            ToolVariant::FreeDraw(t) => t,
            ToolVariant::Delete(t) => t,
        }
    }
}

/// A registered tool: identity, active flag and behavior.
#[derive(Debug)]
pub struct Tool {
    kind: ToolKind,
    active: bool,
    subscription: Option<Subscription>,
    variant: ToolVariant,
}

impl Tool {
    pub fn new(kind: ToolKind, variant: ToolVariant) -> Self {
        Self {
            kind,
            active: false,
            subscription: None,
            variant,
        }
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn selector(&self) -> &'static str {
        self.kind.selector()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_single_use(&self) -> bool {
        self.kind.is_single_use()
    }

    /// Activate or deactivate. Each transition runs the matching lifecycle
    /// hook exactly once; repeating the current state does nothing.
    pub fn set_active(&mut self, active: bool, surface: &mut Surface) {
        if active == self.active {
            return;
        }
        if active {
            let subscription = self.variant.behavior().activate(self.kind, surface);
            self.subscription = Some(subscription);
        } else {
            if let Some(subscription) = self.subscription.take() {
                subscription.dispose(surface.listeners_mut());
            }
            self.variant.behavior().deactivate(surface);
        }
        self.active = active;
    }

    pub fn activate_again(&mut self, surface: &mut Surface) {
        self.variant.behavior().activate_again(surface);
    }

    pub fn use_once(&mut self, surface: &mut Surface) {
        self.variant.behavior().use_once(surface);
    }

    pub fn handle(&mut self, event: SurfaceEvent, surface: &mut Surface) -> Option<ToolAction> {
        self.variant.behavior().handle(event, surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    #[test]
    fn test_selectors_roundtrip() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_selector(kind.selector()), Some(kind));
        }
        assert_eq!(ToolKind::from_selector("pan"), None);
    }

    #[test]
    fn test_only_delete_is_single_use() {
        let single: Vec<_> = ToolKind::ALL.into_iter().filter(|k| k.is_single_use()).collect();
        assert_eq!(single, vec![ToolKind::Delete]);
    }

    #[test]
    fn test_set_active_transitions_once() {
        let mut surface = Surface::new(Size::new(700.0, 500.0));
        let mut tool = Tool::new(
            ToolKind::Rectangle,
            ToolVariant::Shape(ShapeTool::new(ShapeKind::Rectangle, 3.0)),
        );

        tool.set_active(true, &mut surface);
        let attached = surface.listeners().len();
        assert!(attached > 0);

        // Repeating the same state must not attach again.
        tool.set_active(true, &mut surface);
        assert_eq!(surface.listeners().len(), attached);

        tool.set_active(false, &mut surface);
        assert!(surface.listeners().is_empty());
        tool.set_active(false, &mut surface);
        assert!(!tool.is_active());
    }
}
