//! Widget registry for node-type dispatch
//!
//!     This module provides the registry mapping a parse node's type tag to
//!     the factory that builds its widget behavior. Resolution is a pure
//!     function of the type string and happens exactly once per
//!     materialization of a node; late registration is supported, so a module
//!     loader may add types after parts of the tree have already rendered.

use std::collections::HashMap;

use weft_tree::ParseNode;

use crate::error::WidgetError;
use crate::widget::Widget;
use crate::widgets;

/// Builds the behavior instance for one parse node.
pub type WidgetFactory = Box<dyn Fn(&ParseNode) -> Box<dyn Widget>>;

/// Registry of widget classes keyed by node type.
///
/// # Examples
///
/// ```ignore
/// let mut registry = WidgetRegistry::with_defaults();
/// registry.register("badge", |node| Box::new(BadgeWidget::from_node(node)));
///
/// let widget = registry.make(&node)?;
/// ```
pub struct WidgetRegistry {
    factories: HashMap<String, WidgetFactory>,
}

impl WidgetRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        WidgetRegistry {
            factories: HashMap::new(),
        }
    }

    /// Register a widget class for a node type.
    ///
    /// If the type is already registered, the factory is replaced.
    pub fn register<F>(&mut self, node_type: impl Into<String>, factory: F)
    where
        F: Fn(&ParseNode) -> Box<dyn Widget> + 'static,
    {
        self.factories.insert(node_type.into(), Box::new(factory));
    }

    pub fn has(&self, node_type: &str) -> bool {
        self.factories.contains_key(node_type)
    }

    /// Build the widget behavior for a parse node.
    pub fn make(&self, node: &ParseNode) -> Result<Box<dyn Widget>, WidgetError> {
        match self.factories.get(&node.node_type) {
            Some(factory) => Ok(factory(node)),
            None => Err(WidgetError::UnknownNodeType {
                type_name: node.node_type.clone(),
            }),
        }
    }

    /// All registered type names (sorted).
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered type names of a subtype, selected by prefix (sorted).
    ///
    /// Action widgets, for example, all register under an `action-` prefix,
    /// so `names_with_prefix("action-")` is the lookup of every action class.
    pub fn names_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut names: Vec<_> = self
            .factories
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// A registry with the built-in widget classes.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register("container", |_| {
            Box::new(widgets::container::ContainerWidget::new())
        });
        registry.register("element", |node| {
            Box::new(widgets::element::ElementWidget::from_node(node))
        });
        registry.register("text", |node| {
            Box::new(widgets::text::TextWidget::from_node(node))
        });
        registry.register("value", |_| Box::new(widgets::value::ValueWidget::new()));
        registry.register("vars", |_| Box::new(widgets::vars::VarsWidget::new()));
        registry.register("list", |_| Box::new(widgets::list::ListWidget::new()));
        registry.register("action-message", |_| {
            Box::new(widgets::action::ActionMessageWidget::new())
        });

        registry
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DomId;
    use crate::tree::{WidgetId, WidgetTree};

    struct NoopWidget;
    impl Widget for NoopWidget {
        fn execute(&mut self, _tree: &mut WidgetTree, _id: WidgetId) -> Result<(), WidgetError> {
            Ok(())
        }
        fn render(
            &mut self,
            _tree: &mut WidgetTree,
            _id: WidgetId,
            _parent: DomId,
            _next: Option<DomId>,
        ) -> Result<(), WidgetError> {
            Ok(())
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = WidgetRegistry::new();
        assert!(registry.names().is_empty());
    }

    #[test]
    fn test_registry_register_and_has() {
        let mut registry = WidgetRegistry::new();
        registry.register("noop", |_| Box::new(NoopWidget));

        assert!(registry.has("noop"));
        assert!(!registry.has("other"));
        assert_eq!(registry.names(), vec!["noop"]);
    }

    #[test]
    fn test_registry_make_unknown_type() {
        let registry = WidgetRegistry::new();
        let node = ParseNode::new("mystery");
        match registry.make(&node) {
            Err(WidgetError::UnknownNodeType { type_name }) => assert_eq!(type_name, "mystery"),
            other => panic!("expected UnknownNodeType, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_registry_late_registration() {
        let mut registry = WidgetRegistry::new();
        assert!(!registry.has("late"));
        registry.register("late", |_| Box::new(NoopWidget));
        assert!(registry.make(&ParseNode::new("late")).is_ok());
    }

    #[test]
    fn test_registry_replace_factory() {
        let mut registry = WidgetRegistry::new();
        registry.register("noop", |_| Box::new(NoopWidget));
        registry.register("noop", |_| Box::new(NoopWidget));
        assert_eq!(registry.names().len(), 1);
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = WidgetRegistry::with_defaults();
        for name in ["container", "element", "text", "value", "vars", "list"] {
            assert!(registry.has(name), "missing builtin '{}'", name);
        }
    }

    #[test]
    fn test_registry_names_with_prefix() {
        let registry = WidgetRegistry::with_defaults();
        assert_eq!(registry.names_with_prefix("action-"), vec!["action-message"]);
        assert!(registry.names_with_prefix("zz-").is_empty());
    }
}
