//! Generic element widget

use crate::dom::DomId;
use crate::error::WidgetError;
use crate::store::ChangedRecords;
use crate::tree::{WidgetId, WidgetTree};
use crate::widget::{RefreshOutcome, Widget};
use weft_tree::ParseNode;

/// Renders one element node with the parse node's tag, applies the resolved
/// attributes, and renders children inside it.
///
/// The tag comes from the parse tree and never changes, so a refresh never
/// needs structural work: changed attributes are patched onto the existing
/// element in place.
#[derive(Debug)]
pub struct ElementWidget {
    tag: String,
    namespace: Option<String>,
}

impl ElementWidget {
    pub fn from_node(node: &ParseNode) -> Self {
        ElementWidget {
            tag: node.tag.clone().unwrap_or_else(|| "div".to_string()),
            namespace: None,
        }
    }
}

impl Widget for ElementWidget {
    fn execute(&mut self, tree: &mut WidgetTree, id: WidgetId) -> Result<(), WidgetError> {
        self.namespace = tree.attribute(id, "xmlns").map(str::to_string);
        Ok(())
    }

    fn render(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        parent: DomId,
        next: Option<DomId>,
    ) -> Result<(), WidgetError> {
        let element = match &self.namespace {
            Some(namespace) => tree.dom_mut().create_element_ns(namespace, &self.tag)?,
            None => tree.dom_mut().create_element(&self.tag)?,
        };
        for (name, value) in tree.resolved_attributes(id) {
            tree.dom_mut().set_attribute(element, &name, &value)?;
        }
        tree.dom_mut().insert_before(parent, element, next)?;
        tree.push_dom_node(id, element);
        tree.render_children(id, element, None);
        Ok(())
    }

    fn refresh(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        _changed: &ChangedRecords,
    ) -> RefreshOutcome {
        let changed_attributes = tree.compute_attributes(id);
        if changed_attributes.is_empty() {
            return RefreshOutcome::Unchanged;
        }
        if let Some(element) = tree.dom_nodes(id).first().copied() {
            for name in changed_attributes {
                let value = tree.attribute_or(id, &name, "");
                if let Err(error) = tree.dom_mut().set_attribute(element, &name, &value) {
                    tree.report(id, error.into());
                }
            }
        }
        RefreshOutcome::Patched
    }
}
