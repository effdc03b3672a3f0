//! Record field widget

use crate::dom::DomId;
use crate::error::WidgetError;
use crate::store::ChangedRecords;
use crate::tree::{WidgetId, WidgetTree};
use crate::widget::{RefreshOutcome, Widget};

/// Renders one field of one record as a text node.
///
/// Attributes: `record` (required) names the record, `field` defaults to
/// `text`. The record title is this widget's dependency identifier: when the
/// changed-record set names it, the text is patched in place. A change to
/// the resolved attributes themselves (the widget now points at a different
/// record) outranks that and forces a rebuild.
#[derive(Debug, Default)]
pub struct ValueWidget {
    record: String,
    field: String,
    current: String,
}

impl ValueWidget {
    pub fn new() -> Self {
        ValueWidget::default()
    }
}

impl Widget for ValueWidget {
    fn execute(&mut self, tree: &mut WidgetTree, id: WidgetId) -> Result<(), WidgetError> {
        let record = tree.attribute_or(id, "record", "");
        if record.is_empty() {
            return Err(WidgetError::Setup {
                widget: "value".to_string(),
                reason: "missing required attribute 'record'".to_string(),
            });
        }
        let field = tree.attribute_or(id, "field", "text");
        self.current = tree.store_field(&record, &field).unwrap_or_default();
        self.record = record;
        self.field = field;
        Ok(())
    }

    fn render(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        parent: DomId,
        next: Option<DomId>,
    ) -> Result<(), WidgetError> {
        let text = tree.dom_mut().create_text_node(&self.current)?;
        tree.dom_mut().insert_before(parent, text, next)?;
        tree.push_dom_node(id, text);
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
        if !changed.contains(&self.record) {
            return RefreshOutcome::Unchanged;
        }
        let text = tree.store_field(&self.record, &self.field).unwrap_or_default();
        if text != self.current {
            self.current = text.clone();
            if let Some(dom) = tree.dom_nodes(id).first().copied() {
                if let Err(error) = tree.dom_mut().set_text(dom, &text) {
                    tree.report(id, error.into());
                }
            }
        }
        RefreshOutcome::Patched
    }
}
