//! Variable-binding widget

use crate::dom::DomId;
use crate::error::WidgetError;
use crate::tree::{WidgetId, WidgetTree};
use crate::widget::Widget;

/// Binds every resolved attribute as a plain variable in its own scope and
/// renders its children pass-through. The bindings are visible to the
/// subtree only; when a resolved attribute changes, the default refresh
/// rebuilds the subtree so descendants see the new values.
#[derive(Debug, Default)]
pub struct VarsWidget;

impl VarsWidget {
    pub fn new() -> Self {
        VarsWidget
    }
}

impl Widget for VarsWidget {
    fn execute(&mut self, tree: &mut WidgetTree, id: WidgetId) -> Result<(), WidgetError> {
        for (name, value) in tree.resolved_attributes(id) {
            tree.set_variable(id, name, value, Vec::new(), false);
        }
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
