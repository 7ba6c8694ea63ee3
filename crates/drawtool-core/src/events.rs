//! Surface events and the listener table tools attach to.
//!
//! A tool attaches listeners in `activate` and receives a [`Subscription`]
//! back. Disposing the subscription detaches exactly the listeners it
//! attached, so nothing survives a tool switch.

use crate::shapes::ShapeId;
use crate::tools::ToolKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Kinds of events a tool can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    MouseDown,
    MouseMove,
    MouseUp,
    ObjectSelected,
}

/// An event delivered to a listening tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    MouseDown(Point),
    MouseMove(Point),
    MouseUp(Point),
    ObjectSelected(ShapeId),
}

impl SurfaceEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SurfaceEvent::MouseDown(_) => EventKind::MouseDown,
            SurfaceEvent::MouseMove(_) => EventKind::MouseMove,
            SurfaceEvent::MouseUp(_) => EventKind::MouseUp,
            SurfaceEvent::ObjectSelected(_) => EventKind::ObjectSelected,
        }
    }
}

/// Identifier of one attached listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone)]
struct Listener {
    id: ListenerId,
    event: EventKind,
    tool: ToolKind,
}

/// Table of attached listeners, in attachment order.
#[derive(Debug, Clone, Default)]
pub struct Listeners {
    entries: Vec<Listener>,
    next_id: u64,
    /// Total number of attachments ever made.
    attached_total: u64,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener routing `event` to `tool`.
    pub fn attach(&mut self, event: EventKind, tool: ToolKind) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.attached_total += 1;
        self.entries.push(Listener { id, event, tool });
        id
    }

    /// Detach a listener. Returns false if it was already gone.
    pub fn detach(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|l| l.id != id);
        self.entries.len() != before
    }

    /// Tools listening for `event`, in attachment order.
    pub fn targets(&self, event: EventKind) -> Vec<ToolKind> {
        self.entries
            .iter()
            .filter(|l| l.event == event)
            .map(|l| l.tool)
            .collect()
    }

    /// Number of currently attached listeners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of listeners currently attached on behalf of `tool`.
    pub fn count_for(&self, tool: ToolKind) -> usize {
        self.entries.iter().filter(|l| l.tool == tool).count()
    }

    /// Total number of attachments made since creation.
    pub fn attached_total(&self) -> u64 {
        self.attached_total
    }
}

/// Disposer for the listeners a tool attached during activation.
#[derive(Debug, Default)]
#[must_use = "dropping a subscription without disposing it leaks listeners"]
pub struct Subscription {
    ids: Vec<ListenerId>,
}

impl Subscription {
    /// Attach one listener per event kind for `tool` and collect them.
    pub fn attach(listeners: &mut Listeners, tool: ToolKind, events: &[EventKind]) -> Self {
        let ids = events.iter().map(|&e| listeners.attach(e, tool)).collect();
        Self { ids }
    }

    /// Detach every listener this subscription owns.
    pub fn dispose(self, listeners: &mut Listeners) {
        for id in self.ids {
            listeners.detach(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_dispose_detaches_only_its_listeners() {
        let mut listeners = Listeners::new();
        let a = Subscription::attach(
            &mut listeners,
            ToolKind::Line,
            &[EventKind::MouseDown, EventKind::MouseUp],
        );
        let _b = Subscription::attach(&mut listeners, ToolKind::Select, &[EventKind::MouseDown]);
        assert_eq!(listeners.len(), 3);

        a.dispose(&mut listeners);
        assert_eq!(listeners.len(), 1);
        assert_eq!(listeners.targets(EventKind::MouseDown), vec![ToolKind::Select]);
        assert!(listeners.targets(EventKind::MouseUp).is_empty());
        assert_eq!(listeners.attached_total(), 3);
    }

    #[test]
    fn test_detach_twice() {
        let mut listeners = Listeners::new();
        let id = listeners.attach(EventKind::MouseMove, ToolKind::Rectangle);
        assert!(listeners.detach(id));
        assert!(!listeners.detach(id));
    }
}
