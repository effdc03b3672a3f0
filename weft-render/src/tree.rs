//! The widget tree: materialization, selective refresh, removal
//!
//!     [WidgetTree] owns every renderer node in an arena addressed by
//!     [WidgetId]: children hold owned child ids, each node holds a non-owning
//!     parent id, and all traversal runs over the arena rather than through
//!     cyclic references. The parse tree, the record store and the output
//!     backend are collaborators held by handle; the widget nodes themselves
//!     are private to the tree.
//!
//! Lifecycle
//!
//!     A node moves through: unmaterialized → materialized → (refreshing) →
//!     patched, rebuilt or removed. Materialization resolves attributes
//!     against the scope chain, runs the widget's `execute`, emits output
//!     nodes through the adapter and descends into children. Refresh asks
//!     every node for a [RefreshOutcome]; a rebuild tears the subtree down
//!     and re-materializes in place, splicing the new output back at the old
//!     position via forward sibling scanning.
//!
//! Failure policy
//!
//!     Widget failures degrade the failing node to an empty placeholder and
//!     are recorded as [Diagnostic]s; siblings and ancestors proceed. Output
//!     adapter failures abort only the current subtree, and are fatal only
//!     while materializing the root.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use weft_tree::{Attribute, ParseNode};

use crate::dom::{Dom, DomId};
use crate::error::{Diagnostic, WidgetError};
use crate::event::EventHandler;
use crate::registry::WidgetRegistry;
use crate::scope::{
    self, VariableBinding, VariableInfo, VariableOptions, VariableParam,
};
use crate::store::{ChangedRecords, Store};
use crate::widget::{PlaceholderWidget, RefreshOutcome, Widget};

/// Handle to one node in the widget arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(pub(crate) usize);

pub(crate) struct WidgetNode {
    pub(crate) node: Rc<ParseNode>,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<WidgetId>,
    /// Output nodes this widget created directly; empty for pass-through
    /// widgets that delegate entirely to children.
    pub(crate) dom_nodes: Vec<DomId>,
    /// The output node this widget rendered into.
    pub(crate) parent_dom: Option<DomId>,
    /// Resolved attribute values from the last compute pass.
    pub(crate) attributes: HashMap<String, String>,
    /// Local scope; overlays the parent chain, never mutates it.
    pub(crate) variables: HashMap<String, VariableBinding>,
    /// Bindings wrapped around this node at creation (child overrides, root
    /// initials). Restored as the base scope when the node rebuilds.
    pub(crate) wrapped_variables: HashMap<String, VariableBinding>,
    pub(crate) listeners: HashMap<String, EventHandler>,
    pub(crate) ancestor_count: usize,
    pub(crate) qualifier: u64,
    pub(crate) materialized: bool,
    /// Checked out while a behavior method runs.
    pub(crate) widget: Option<Box<dyn Widget>>,
}

enum Slot {
    Occupied(Box<WidgetNode>),
    Vacant,
}

/// The render/refresh engine. See the module docs.
pub struct WidgetTree {
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: Option<WidgetId>,
    root_node: Rc<ParseNode>,
    registry: Rc<WidgetRegistry>,
    store: Rc<dyn Store>,
    dom: Box<dyn Dom>,
    diagnostics: Vec<Diagnostic>,
    initial_variables: HashMap<String, VariableBinding>,
}

impl WidgetTree {
    pub fn new(
        root: impl Into<Rc<ParseNode>>,
        registry: Rc<WidgetRegistry>,
        store: Rc<dyn Store>,
        dom: Box<dyn Dom>,
    ) -> Self {
        WidgetTree {
            slots: Vec::new(),
            free: Vec::new(),
            root: None,
            root_node: root.into(),
            registry,
            store,
            dom,
            diagnostics: Vec::new(),
            initial_variables: HashMap::new(),
        }
    }

    /// Wrap an initial variable binding around the root, e.g. a top-level
    /// template parameter.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.initial_variables
            .insert(name.into(), VariableBinding::plain(value));
        self
    }

    pub fn root(&self) -> Option<WidgetId> {
        self.root
    }

    /// Number of live widget nodes.
    pub fn node_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Occupied(_)))
            .count()
    }

    // ----- materialization ---------------------------------------------------

    /// Materialize the whole tree under `parent`, before `next`.
    ///
    /// Fails only when the output adapter fails for the root itself; every
    /// other error degrades the affected node and is recorded as a
    /// diagnostic.
    pub fn render_into(&mut self, parent: DomId, next: Option<DomId>) -> Result<(), WidgetError> {
        if self.root.is_some() {
            self.clear();
        }
        let ast = Rc::clone(&self.root_node);
        let id = self.create_node(ast, None);
        let initial = self.initial_variables.clone();
        if let Some(node) = self.get_mut(id) {
            for (name, binding) in initial {
                node.wrapped_variables.insert(name.clone(), binding.clone());
                node.variables.insert(name, binding);
            }
        }
        self.root = Some(id);
        self.render_node(id, parent, next)
    }

    /// Tear the whole tree down: remove all output nodes, free all widget
    /// nodes. Synchronous and total.
    pub fn clear(&mut self) {
        if let Some(root) = self.root.take() {
            self.remove_child_dom_nodes(root);
            self.free_subtree(root);
        }
    }

    fn create_node(&mut self, ast: Rc<ParseNode>, parent: Option<WidgetId>) -> WidgetId {
        let (ancestor_count, qualifier) = match parent.and_then(|p| self.get(p)) {
            Some(parent_node) => {
                let mut hasher = DefaultHasher::new();
                parent_node.qualifier.hash(&mut hasher);
                ast.node_type.hash(&mut hasher);
                parent_node.children.len().hash(&mut hasher);
                (parent_node.ancestor_count + 1, hasher.finish())
            }
            None => {
                let mut hasher = DefaultHasher::new();
                ast.node_type.hash(&mut hasher);
                (0, hasher.finish())
            }
        };

        let node = Box::new(WidgetNode {
            node: Rc::clone(&ast),
            parent,
            children: Vec::new(),
            dom_nodes: Vec::new(),
            parent_dom: None,
            attributes: HashMap::new(),
            variables: HashMap::new(),
            wrapped_variables: HashMap::new(),
            listeners: HashMap::new(),
            ancestor_count,
            qualifier,
            materialized: false,
            widget: None,
        });

        let id = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Slot::Occupied(node);
                WidgetId(index)
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                WidgetId(self.slots.len() - 1)
            }
        };

        let registry = Rc::clone(&self.registry);
        let widget = match registry.make(&ast) {
            Ok(widget) => widget,
            Err(error) => {
                self.report(id, error);
                Box::new(PlaceholderWidget)
            }
        };
        self.put_widget(id, widget);
        id
    }

    /// Materialize one node. `Err` only on output adapter failure.
    fn render_node(
        &mut self,
        id: WidgetId,
        parent: DomId,
        next: Option<DomId>,
    ) -> Result<(), WidgetError> {
        if let Some(node) = self.get_mut(id) {
            node.parent_dom = Some(parent);
        }
        self.compute_attributes(id);

        let Some(mut widget) = self.take_widget(id) else {
            return Ok(());
        };
        let result = widget
            .execute(self, id)
            .and_then(|()| widget.render(self, id, parent, next));
        self.put_widget(id, widget);

        let outcome = match result {
            Ok(()) => Ok(()),
            Err(WidgetError::OutputAdapter(error)) => Err(WidgetError::OutputAdapter(error)),
            Err(error) => {
                self.report(id, error);
                self.degrade(id, parent, next)
            }
        };
        if let Some(node) = self.get_mut(id) {
            node.materialized = true;
        }
        outcome
    }

    /// Replace whatever a failed node produced with an empty placeholder,
    /// preserving tree shape for later refresh cycles.
    fn degrade(
        &mut self,
        id: WidgetId,
        parent: DomId,
        next: Option<DomId>,
    ) -> Result<(), WidgetError> {
        self.remove_child_dom_nodes(id);
        self.free_children(id);
        if let Some(node) = self.get_mut(id) {
            node.dom_nodes.clear();
        }
        let placeholder = self.dom.create_text_node("")?;
        self.dom.insert_before(parent, placeholder, next)?;
        self.push_dom_node(id, placeholder);
        Ok(())
    }

    /// Make child widget nodes for every parse tree child of `id`.
    pub fn make_child_widgets(&mut self, id: WidgetId) {
        let ast_children = match self.get(id) {
            Some(node) => node.node.children.clone(),
            None => return,
        };
        for child_ast in ast_children {
            self.make_child_widget(id, child_ast, Vec::new());
        }
    }

    /// Make one child widget node, resolving its type through the registry.
    /// `variables` are bindings wrapped around the child's scope.
    pub fn make_child_widget(
        &mut self,
        id: WidgetId,
        ast: Rc<ParseNode>,
        variables: Vec<(String, VariableBinding)>,
    ) -> WidgetId {
        let child = self.create_node(ast, Some(id));
        if let Some(node) = self.get_mut(child) {
            for (name, binding) in variables {
                node.wrapped_variables.insert(name.clone(), binding.clone());
                node.variables.insert(name, binding);
            }
        }
        if let Some(node) = self.get_mut(id) {
            node.children.push(child);
        }
        child
    }

    /// Make one child widget node with an explicit behavior, bypassing the
    /// registry. Used by widgets that synthesize children not present in the
    /// parse tree (list items, for example).
    pub fn make_child_widget_with(
        &mut self,
        id: WidgetId,
        ast: Rc<ParseNode>,
        widget: Box<dyn Widget>,
        variables: Vec<(String, VariableBinding)>,
    ) -> WidgetId {
        let child = self.make_child_widget(id, ast, variables);
        self.put_widget(child, widget);
        child
    }

    /// Make and render child widgets for every parse tree child of `id`.
    ///
    /// Every child is rendered against the same `(parent, next)` anchor;
    /// inserting before a fixed anchor keeps output in left-to-right order
    /// even when some children are pass-through. An adapter failure in one
    /// child aborts that subtree only: it is recorded and siblings continue.
    pub fn render_children(&mut self, id: WidgetId, parent: DomId, next: Option<DomId>) {
        self.make_child_widgets(id);
        self.render_current_children(id, parent, next);
    }

    /// Render the already-created child widget nodes of `id`.
    pub fn render_current_children(&mut self, id: WidgetId, parent: DomId, next: Option<DomId>) {
        let children = match self.get(id) {
            Some(node) => node.children.clone(),
            None => return,
        };
        for child in children {
            if let Err(error) = self.render_node(child, parent, next) {
                self.report(child, error);
            }
        }
    }

    // ----- attributes and scope ----------------------------------------------

    /// Resolve every parse tree attribute of `id` against the scope chain and
    /// store the results. Returns the names whose resolved value changed.
    pub fn compute_attributes(&mut self, id: WidgetId) -> Vec<String> {
        let (ast, report_failures) = match self.get(id) {
            Some(node) => (Rc::clone(&node.node), !node.materialized),
            None => return Vec::new(),
        };

        let mut resolved: Vec<(String, String)> = Vec::new();
        let mut failures: Vec<WidgetError> = Vec::new();
        for (name, attribute) in ast.attribute_pairs() {
            let (value, failure) = self.resolve_attribute(id, name, attribute);
            if let Some(failure) = failure {
                // Reported once, at materialization; refresh recomputation
                // does not repeat it.
                if report_failures {
                    failures.push(failure);
                }
            }
            resolved.push((name.to_string(), value));
        }
        for failure in failures {
            self.report(id, failure);
        }

        let mut changed = Vec::new();
        if let Some(node) = self.get_mut(id) {
            for (name, value) in resolved {
                if node.attributes.get(&name) != Some(&value) {
                    node.attributes.insert(name.clone(), value);
                    changed.push(name);
                }
            }
        }
        changed
    }

    fn resolve_attribute(
        &self,
        id: WidgetId,
        attribute_name: &str,
        attribute: &Attribute,
    ) -> (String, Option<WidgetError>) {
        match attribute {
            Attribute::String { value, .. } => (value.clone(), None),
            Attribute::Number { value, .. } => (format!("{}", value), None),
            Attribute::Boolean { value, .. } => (value.to_string(), None),
            Attribute::MacroCall { name, params, .. } => {
                let info = self.variable_info(
                    id,
                    name,
                    &VariableOptions::with_params(params.clone()),
                );
                let failure = (!info.found).then(|| WidgetError::AttributeResolution {
                    attribute: attribute_name.to_string(),
                    reason: format!("variable '{}' is not defined", name),
                });
                (info.text, failure)
            }
        }
    }

    /// Resolved attribute value from the last compute pass.
    pub fn attribute(&self, id: WidgetId, name: &str) -> Option<&str> {
        self.get(id)?.attributes.get(name).map(String::as_str)
    }

    pub fn attribute_or(&self, id: WidgetId, name: &str, default: &str) -> String {
        self.attribute(id, name).unwrap_or(default).to_string()
    }

    pub fn has_attribute(&self, id: WidgetId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Resolved attributes as `(name, value)` pairs in resolution order.
    pub fn resolved_attributes(&self, id: WidgetId) -> Vec<(String, String)> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };
        node.node
            .attribute_pairs()
            .iter()
            .map(|(name, _)| {
                let value = node.attributes.get(*name).cloned().unwrap_or_default();
                ((*name).to_string(), value)
            })
            .collect()
    }

    /// Set a variable in `id`'s local scope. Visible to the subtree from the
    /// next materialization or refresh of each descendant, never to ancestors.
    pub fn set_variable(
        &mut self,
        id: WidgetId,
        name: impl Into<String>,
        value: impl Into<String>,
        params: Vec<VariableParam>,
        is_macro_definition: bool,
    ) {
        if let Some(node) = self.get_mut(id) {
            node.variables.insert(
                name.into(),
                VariableBinding {
                    value: value.into(),
                    params,
                    is_macro_definition,
                },
            );
        }
    }

    /// Variable text with default options; empty string when unbound.
    pub fn get_variable(&self, id: WidgetId, name: &str) -> String {
        self.variable_info(id, name, &VariableOptions::default()).text
    }

    pub fn get_variable_with(&self, id: WidgetId, name: &str, options: &VariableOptions) -> String {
        self.variable_info(id, name, options).text
    }

    /// Walk the scope chain from `id` outward and resolve `name`.
    pub fn variable_info(
        &self,
        id: WidgetId,
        name: &str,
        options: &VariableOptions,
    ) -> VariableInfo {
        let mut current = Some(id);
        while let Some(cursor) = current {
            let Some(node) = self.get(cursor) else { break };
            if let Some(binding) = node.variables.get(name) {
                let bound = scope::bind_parameters(&binding.params, &options.params);
                let mut text = scope::substitute_parameters(&binding.value, &bound);
                if binding.is_macro_definition {
                    text = scope::substitute_variables(&text, |reference| {
                        self.lookup_raw(id, reference)
                    });
                }
                return VariableInfo { text, found: true };
            }
            current = node.parent;
        }
        VariableInfo {
            text: options.default.clone().unwrap_or_default(),
            found: false,
        }
    }

    /// Raw binding value for `name`, no substitution. One-pass lookups for
    /// `$(variable)$` references go through this so substituted values are
    /// never re-expanded.
    fn lookup_raw(&self, id: WidgetId, name: &str) -> Option<String> {
        let mut current = Some(id);
        while let Some(cursor) = current {
            let node = self.get(cursor)?;
            if let Some(binding) = node.variables.get(name) {
                return Some(binding.value.clone());
            }
            current = node.parent;
        }
        None
    }

    // ----- refresh -----------------------------------------------------------

    /// Selectively refresh the tree against this cycle's changed records.
    /// Returns whether anything refreshed.
    pub fn refresh(&mut self, changed: &ChangedRecords) -> bool {
        match self.root {
            Some(root) => self.refresh_node(root, changed),
            None => false,
        }
    }

    fn refresh_node(&mut self, id: WidgetId, changed: &ChangedRecords) -> bool {
        let Some(mut widget) = self.take_widget(id) else {
            return false;
        };
        let outcome = widget.refresh(self, id, changed);
        self.put_widget(id, widget);

        match outcome {
            // A rebuild re-renders the whole subtree; a second descent would
            // be redundant.
            RefreshOutcome::Rebuild => {
                self.rebuild_node(id);
                true
            }
            RefreshOutcome::Patched => {
                self.refresh_children(id, changed);
                true
            }
            RefreshOutcome::Unchanged => self.refresh_children(id, changed),
        }
    }

    /// Refresh every child of `id`; returns whether any child refreshed.
    /// A failing child never blocks its siblings.
    pub fn refresh_children(&mut self, id: WidgetId, changed: &ChangedRecords) -> bool {
        let children = match self.get(id) {
            Some(node) => node.children.clone(),
            None => return false,
        };
        let mut refreshed = false;
        for child in children {
            if self.refresh_node(child, changed) {
                refreshed = true;
            }
        }
        refreshed
    }

    /// Tear down and re-materialize `id` in place, splicing the new output
    /// back at the old position.
    fn rebuild_node(&mut self, id: WidgetId) {
        let next = self.find_next_sibling_dom(id);
        self.remove_child_dom_nodes(id);
        self.free_children(id);
        let parent = match self.get_mut(id) {
            Some(node) => {
                node.dom_nodes.clear();
                // The scope resets to the creation-time wrapping; listeners
                // belong to the surviving node and are kept.
                node.variables = node.wrapped_variables.clone();
                node.materialized = false;
                node.parent_dom
            }
            None => None,
        };
        let Some(parent) = parent else { return };
        // A refresh failure here must not block siblings or ancestors.
        if let Err(error) = self.render_node(id, parent, next) {
            self.report(id, error);
        }
    }

    // ----- removal -----------------------------------------------------------

    /// Remove the output nodes below `id`: a node owning output directly has
    /// exactly those removed with no further descent (children are contained
    /// within them); a pass-through node delegates to each child in turn.
    pub fn remove_child_dom_nodes(&mut self, id: WidgetId) {
        let (doms, children) = match self.get(id) {
            Some(node) => (node.dom_nodes.clone(), node.children.clone()),
            None => return,
        };
        if !doms.is_empty() {
            for dom in doms {
                if let Err(error) = self.dom.remove(dom) {
                    self.report(id, WidgetError::OutputAdapter(error));
                }
            }
        } else {
            for child in children {
                self.remove_child_dom_nodes(child);
            }
        }
    }

    /// Free the descendants of `id`, keeping `id` itself.
    fn free_children(&mut self, id: WidgetId) {
        let children = match self.get_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            self.free_subtree(child);
        }
    }

    fn free_subtree(&mut self, id: WidgetId) {
        let children = match self.get(id) {
            Some(node) => node.children.clone(),
            None => return,
        };
        for child in children {
            self.free_subtree(child);
        }
        self.slots[id.0] = Slot::Vacant;
        self.free.push(id.0);
    }

    // ----- output tree queries -----------------------------------------------

    /// First output node generated by `id` or its descendants.
    pub fn find_first_dom_node(&self, id: WidgetId) -> Option<DomId> {
        let node = self.get(id)?;
        if let Some(&dom) = node.dom_nodes.first() {
            return Some(dom);
        }
        for &child in &node.children {
            if let Some(dom) = self.find_first_dom_node(child) {
                return Some(dom);
            }
        }
        None
    }

    /// The output node following `id`'s output: scans forward through later
    /// siblings, descending into pass-through descendants, to find the next
    /// actual anchor. When a pass-through parent's siblings are exhausted the
    /// scan continues from the parent, since its output lives in the same
    /// output node as `id`'s.
    pub fn find_next_sibling_dom(&self, id: WidgetId) -> Option<DomId> {
        let parent = self.get(id)?.parent?;
        let parent_node = self.get(parent)?;
        let index = parent_node.children.iter().position(|&c| c == id)?;
        for &sibling in &parent_node.children[index + 1..] {
            if let Some(dom) = self.find_first_dom_node(sibling) {
                return Some(dom);
            }
        }
        if parent_node.dom_nodes.is_empty() {
            return self.find_next_sibling_dom(parent);
        }
        None
    }

    /// Record an output node as directly created by `id`.
    pub fn push_dom_node(&mut self, id: WidgetId, dom: DomId) {
        if let Some(node) = self.get_mut(id) {
            node.dom_nodes.push(dom);
        }
    }

    pub fn dom_nodes(&self, id: WidgetId) -> Vec<DomId> {
        self.get(id).map(|n| n.dom_nodes.clone()).unwrap_or_default()
    }

    // ----- structure queries -------------------------------------------------

    pub fn parse_node(&self, id: WidgetId) -> Option<Rc<ParseNode>> {
        self.get(id).map(|n| Rc::clone(&n.node))
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.get(id)?.parent
    }

    pub fn children(&self, id: WidgetId) -> Vec<WidgetId> {
        self.get(id).map(|n| n.children.clone()).unwrap_or_default()
    }

    pub fn ancestor_count(&self, id: WidgetId) -> usize {
        self.get(id).map(|n| n.ancestor_count).unwrap_or(0)
    }

    /// Unique qualifier for generated output identifiers, stable for the
    /// node's position until it is re-materialized.
    pub fn qualifier(&self, id: WidgetId, prefix: &str) -> String {
        let hash = self.get(id).map(|n| n.qualifier).unwrap_or(0);
        format!("{}-{:016x}", prefix, hash)
    }

    // ----- collaborators -----------------------------------------------------

    pub fn dom_mut(&mut self) -> &mut dyn Dom {
        self.dom.as_mut()
    }

    pub fn is_interactive(&self) -> bool {
        self.dom.is_interactive()
    }

    pub fn store(&self) -> Rc<dyn Store> {
        Rc::clone(&self.store)
    }

    pub fn store_field(&self, title: &str, field: &str) -> Option<String> {
        self.store.field(title, field)
    }

    // ----- diagnostics -------------------------------------------------------

    pub(crate) fn report(&mut self, id: WidgetId, error: WidgetError) {
        let node_type = self
            .parse_node(id)
            .map(|n| n.node_type.clone())
            .unwrap_or_default();
        log::warn!("widget '{}' degraded: {}", node_type, error);
        self.diagnostics.push(Diagnostic {
            widget: id,
            node_type,
            error,
        });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    // ----- arena plumbing ----------------------------------------------------

    pub(crate) fn get(&self, id: WidgetId) -> Option<&WidgetNode> {
        match self.slots.get(id.0) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, id: WidgetId) -> Option<&mut WidgetNode> {
        match self.slots.get_mut(id.0) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    pub(crate) fn take_widget(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        self.get_mut(id)?.widget.take()
    }

    pub(crate) fn put_widget(&mut self, id: WidgetId, widget: Box<dyn Widget>) {
        if let Some(node) = self.get_mut(id) {
            node.widget = Some(widget);
        }
    }
}
