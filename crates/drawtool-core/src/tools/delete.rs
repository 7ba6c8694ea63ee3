//! Delete tool: removes the selection and never becomes current.

use super::{ToolBehavior, ToolKind};
use crate::events::Subscription;
use crate::surface::Surface;

#[derive(Debug, Clone, Default)]
pub struct DeleteTool;

impl ToolBehavior for DeleteTool {
    fn activate(&mut self, _kind: ToolKind, _surface: &mut Surface) -> Subscription {
        Subscription::default()
    }

    fn deactivate(&mut self, _surface: &mut Surface) {}

    fn use_once(&mut self, surface: &mut Surface) {
        let removed = surface.remove_selected();
        log::debug!("Deleted {} selected object(s)", removed.len());
        surface.render_all();
    }
}
