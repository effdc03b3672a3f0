//! The widget behavior trait
//!
//!     One [Widget] implementation exists per node type; one boxed instance
//!     lives on every materialized node. The tree drives the lifecycle
//!     (attribute resolution, descent, teardown) and calls into the behavior
//!     for the type-specific parts: deriving state, emitting output nodes,
//!     and deciding how to react to a changed-record set.

use crate::dom::DomId;
use crate::error::WidgetError;
use crate::event::WidgetEvent;
use crate::store::ChangedRecords;
use crate::tree::{WidgetId, WidgetTree};

/// A widget's decision for one refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Nothing this widget renders depends on the changed records. The tree
    /// still descends into children.
    Unchanged,
    /// The widget updated its existing output nodes in place. The tree still
    /// descends into children.
    Patched,
    /// A structural change is required: the tree tears the subtree down and
    /// re-materializes this node in place. No separate descent happens; the
    /// rebuild re-renders everything below.
    Rebuild,
}

/// Node-type-specific rendering behavior.
///
/// `execute` and `render` run during materialization, in that order, after
/// the tree has resolved the node's attributes. Any error they return is
/// caught at the node boundary: the node renders as an empty placeholder and
/// a diagnostic is recorded; only output-adapter errors propagate (and only
/// the root's are fatal).
pub trait Widget {
    /// Compute internal state from resolved attributes and the store.
    fn execute(&mut self, tree: &mut WidgetTree, id: WidgetId) -> Result<(), WidgetError>;

    /// Create output nodes at `(parent, next)` and render children.
    fn render(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        parent: DomId,
        next: Option<DomId>,
    ) -> Result<(), WidgetError>;

    /// Decide how this node reacts to the cycle's changed records.
    ///
    /// The default recomputes attributes and asks for a rebuild when any
    /// resolved value changed, which is correct for any widget whose output
    /// is a pure function of its attributes. Structural change outranks
    /// patching; widgets that can patch return [RefreshOutcome::Patched]
    /// only when no rebuild is needed.
    fn refresh(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        changed: &ChangedRecords,
    ) -> RefreshOutcome {
        let _ = changed;
        if tree.compute_attributes(id).is_empty() {
            RefreshOutcome::Unchanged
        } else {
            RefreshOutcome::Rebuild
        }
    }

    /// Run this widget as an action, if it is one. `None` means "not an
    /// action"; `Some(handled)` is the action's own result.
    fn invoke_action(
        &mut self,
        tree: &mut WidgetTree,
        id: WidgetId,
        triggering: WidgetId,
        event: &WidgetEvent,
    ) -> Option<bool> {
        let _ = (tree, id, triggering, event);
        None
    }
}

/// Stand-in behavior for parse nodes whose type has no registered widget.
///
/// Renders a single empty text node so the failed node still occupies a
/// position in the output tree for later refresh cycles.
#[derive(Debug, Default)]
pub struct PlaceholderWidget;

impl Widget for PlaceholderWidget {
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
        let placeholder = tree.dom_mut().create_text_node("")?;
        tree.dom_mut().insert_before(parent, placeholder, next)?;
        tree.push_dom_node(id, placeholder);
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
