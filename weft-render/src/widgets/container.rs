//! Pass-through container

use crate::dom::DomId;
use crate::error::WidgetError;
use crate::tree::{WidgetId, WidgetTree};
use crate::widget::Widget;

/// Renders nothing of its own; children go straight into the parent output
/// node. Also the behavior of synthesized wrapper nodes such as list items.
#[derive(Debug, Default)]
pub struct ContainerWidget;

impl ContainerWidget {
    pub fn new() -> Self {
        ContainerWidget
    }
}

impl Widget for ContainerWidget {
    fn execute(&mut self, _tree: &mut WidgetTree, _id: WidgetId) -> Result<(), WidgetError> {
        Ok(())
    }

    fn render(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        parent: DomId,
        next: Option<DomId>,
    ) -> Result<(), WidgetError> {
        tree.render_children(id, parent, next);
        Ok(())
    }
}
