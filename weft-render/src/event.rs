//! Event dispatch: bubbling and action invocation
//!
//!     Events dispatched on a node bubble up the parent chain until a
//!     listener reports them handled; a root that leaves an event unhandled
//!     drops it silently. Listeners are plain synchronous closures — the
//!     dispatch walk never awaits anything. A handler that needs
//!     asynchronous work spawns it itself; any store mutation from such
//!     deferred work becomes visible only through the next refresh cycle's
//!     changed-record set, never mid-dispatch.

use std::collections::HashMap;
use std::rc::Rc;

use crate::tree::{WidgetId, WidgetTree};

/// A listener: returns whether it handled the event.
pub type EventHandler = Rc<dyn Fn(&WidgetEvent) -> bool>;

/// A named event travelling through the widget tree.
#[derive(Debug, Clone)]
pub struct WidgetEvent {
    /// Event name as used by `add_event_listener`.
    pub event_type: String,
    /// Optional single string payload.
    pub param: Option<String>,
    /// Additional named payload fields.
    pub params: HashMap<String, String>,
    /// The widget the event was first dispatched on, when known.
    pub origin: Option<WidgetId>,
}

impl WidgetEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        WidgetEvent {
            event_type: event_type.into(),
            param: None,
            params: HashMap::new(),
            origin: None,
        }
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn from_widget(mut self, id: WidgetId) -> Self {
        self.origin = Some(id);
        self
    }
}

impl WidgetTree {
    /// Register a listener on one node. One listener per event name per
    /// node; registering again replaces the previous one.
    pub fn add_event_listener<F>(&mut self, id: WidgetId, event_type: impl Into<String>, handler: F)
    where
        F: Fn(&WidgetEvent) -> bool + 'static,
    {
        if let Some(node) = self.get_mut(id) {
            node.listeners.insert(event_type.into(), Rc::new(handler));
        }
    }

    /// Register a batch of listeners on one node.
    pub fn add_event_listeners(
        &mut self,
        id: WidgetId,
        listeners: Vec<(String, EventHandler)>,
    ) {
        if let Some(node) = self.get_mut(id) {
            for (event_type, handler) in listeners {
                node.listeners.insert(event_type, handler);
            }
        }
    }

    /// Dispatch an event on `id`, bubbling up the parent chain until a
    /// listener handles it. Returns whether anyone did.
    pub fn dispatch_event(&self, id: WidgetId, event: &WidgetEvent) -> bool {
        let mut current = Some(id);
        while let Some(cursor) = current {
            let handler = self
                .get(cursor)
                .and_then(|node| node.listeners.get(&event.event_type).cloned());
            if let Some(handler) = handler {
                if handler(event) {
                    return true;
                }
            }
            current = self.get(cursor).and_then(|node| node.parent);
        }
        false
    }

    /// Ask every descendant of `id` capable of being an action to run,
    /// depth-first. A child whose own action reports handled short-circuits
    /// its branch; sibling branches are still visited. Returns whether any
    /// branch handled the event.
    pub fn invoke_actions(
        &mut self,
        id: WidgetId,
        triggering: WidgetId,
        event: &WidgetEvent,
    ) -> bool {
        let children = self.children(id);
        let mut handled = false;
        for child in children {
            let own = match self.take_widget(child) {
                Some(mut widget) => {
                    let result = widget.invoke_action(self, child, triggering, event);
                    self.put_widget(child, widget);
                    result
                }
                None => None,
            };
            match own {
                Some(true) => handled = true,
                _ => {
                    if self.invoke_actions(child, triggering, event) {
                        handled = true;
                    }
                }
            }
        }
        handled
    }
}
