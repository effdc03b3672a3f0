//! Message-sending action widget

use std::collections::HashMap;

use crate::dom::DomId;
use crate::error::WidgetError;
use crate::event::WidgetEvent;
use crate::tree::{WidgetId, WidgetTree};
use crate::widget::Widget;

/// When invoked as an action, dispatches a new event from its own position:
/// the event type comes from the `message` attribute, the single payload
/// from `param`, and every other attribute becomes a named payload field.
///
/// Renders pass-through so actions can nest.
#[derive(Debug, Default)]
pub struct ActionMessageWidget {
    message: Option<String>,
    param: Option<String>,
    payload: HashMap<String, String>,
}

impl ActionMessageWidget {
    pub fn new() -> Self {
        ActionMessageWidget::default()
    }
}

impl Widget for ActionMessageWidget {
    fn execute(&mut self, tree: &mut WidgetTree, id: WidgetId) -> Result<(), WidgetError> {
        self.message = tree.attribute(id, "message").map(str::to_string);
        self.param = tree.attribute(id, "param").map(str::to_string);
        self.payload = tree
            .resolved_attributes(id)
            .into_iter()
            .filter(|(name, _)| name != "message" && name != "param")
            .collect();
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

    fn invoke_action(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        _triggering: WidgetId,
        event: &WidgetEvent,
    ) -> Option<bool> {
        let message = match &self.message {
            Some(message) => message.clone(),
            None => return Some(false),
        };
        let mut outgoing = WidgetEvent::new(message).from_widget(id);
        outgoing.param = self.param.clone().or_else(|| event.param.clone());
        outgoing.params = self.payload.clone();
        tree.dispatch_event(id, &outgoing);
        Some(true)
    }
}
