//! List widget

use crate::dom::DomId;
use crate::error::WidgetError;
use crate::scope::VariableBinding;
use crate::store::ChangedRecords;
use crate::tree::{WidgetId, WidgetTree};
use crate::widget::{RefreshOutcome, Widget};
use crate::widgets::container::ContainerWidget;

/// Renders one copy of its children per record title, with the title bound
/// to a variable around each copy.
///
/// The titles come from the `of` attribute (whitespace-separated), or from a
/// store field when `from` names a record (`field` defaults to `text`). The
/// bound variable name is `variable`, default `currentRecord`.
///
/// Membership is the structural part: when the title set changes the whole
/// list rebuilds. When the source record changed but membership did not,
/// nothing structural happens and the ordinary descent covers the items.
#[derive(Debug)]
pub struct ListWidget {
    titles: Vec<String>,
    variable: String,
    from: Option<String>,
    field: String,
}

impl ListWidget {
    pub fn new() -> Self {
        ListWidget {
            titles: Vec::new(),
            variable: "currentRecord".to_string(),
            from: None,
            field: "text".to_string(),
        }
    }

    fn current_titles(&self, tree: &WidgetTree, id: WidgetId) -> Vec<String> {
        let source = match &self.from {
            Some(title) => tree.store_field(title, &self.field).unwrap_or_default(),
            None => tree.attribute_or(id, "of", ""),
        };
        source.split_whitespace().map(str::to_string).collect()
    }
}

impl Widget for ListWidget {
    fn execute(&mut self, tree: &mut WidgetTree, id: WidgetId) -> Result<(), WidgetError> {
        self.from = tree.attribute(id, "from").map(str::to_string);
        self.field = tree.attribute_or(id, "field", "text");
        self.variable = tree.attribute_or(id, "variable", "currentRecord");
        self.titles = self.current_titles(tree, id);
        Ok(())
    }

    fn render(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        parent: DomId,
        next: Option<DomId>,
    ) -> Result<(), WidgetError> {
        let Some(ast) = tree.parse_node(id) else {
            return Ok(());
        };
        for title in &self.titles {
            // Each item is a synthesized container around the template
            // children, scoped to its title.
            tree.make_child_widget_with(
                id,
                std::rc::Rc::clone(&ast),
                Box::new(ContainerWidget::new()),
                vec![(self.variable.clone(), VariableBinding::plain(title))],
            );
        }
        tree.render_current_children(id, parent, next);
        Ok(())
    }

    fn refresh(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        changed: &ChangedRecords,
    ) -> RefreshOutcome {
        if !tree.compute_attributes(id).is_empty() {
            return RefreshOutcome::Rebuild;
        }
        let source_changed = self
            .from
            .as_deref()
            .map_or(false, |title| changed.contains(title));
        if !source_changed {
            return RefreshOutcome::Unchanged;
        }
        if self.current_titles(tree, id) != self.titles {
            // Membership changed: structural change outranks patching.
            RefreshOutcome::Rebuild
        } else {
            RefreshOutcome::Patched
        }
    }
}
