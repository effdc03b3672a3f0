//! Literal text widget

use crate::dom::DomId;
use crate::error::WidgetError;
use crate::store::ChangedRecords;
use crate::tree::{WidgetId, WidgetTree};
use crate::widget::{RefreshOutcome, Widget};
use weft_tree::ParseNode;

/// Renders the parse node's literal text. The text lives in the parse tree
/// and cannot change, so refresh is always a no-op.
#[derive(Debug)]
pub struct TextWidget {
    text: String,
}

impl TextWidget {
    pub fn from_node(node: &ParseNode) -> Self {
        TextWidget {
            text: node.text.clone().unwrap_or_default(),
        }
    }
}

impl Widget for TextWidget {
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
        let text = tree.dom_mut().create_text_node(&self.text)?;
        tree.dom_mut().insert_before(parent, text, next)?;
        tree.push_dom_node(id, text);
        Ok(())
    }

    fn refresh(
        &mut self,
        _tree: &mut WidgetTree,
        _id: WidgetId,
        _changed: &ChangedRecords,
    ) -> RefreshOutcome {
        RefreshOutcome::Unchanged
    }
}
