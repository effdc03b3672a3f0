//! Headless output backend
//!
//!     [FakeDom] implements the [Dom] adapter over its own node arena, so the
//!     whole rendering core can run without an interactive surface — on a
//!     server, or under test. It adds inspection accessors and an HTML-ish
//!     [serialize](FakeDom::serialize) so output trees can be asserted
//!     against directly.
//!
//!     [SharedDom] is the handle form: a clonable `Rc<RefCell<FakeDom>>`
//!     wrapper that itself implements [Dom], letting a caller keep one handle
//!     for inspection while the tree owns another.

use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::dom::{Dom, DomError, DomId};

#[derive(Debug, Clone)]
enum FakeNodeKind {
    Element {
        namespace: Option<String>,
        tag: String,
        // BTreeMap keeps serialization deterministic.
        attributes: BTreeMap<String, String>,
        children: Vec<DomId>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct FakeNode {
    kind: FakeNodeKind,
    parent: Option<DomId>,
}

/// Arena-backed fake DOM.
#[derive(Debug, Default)]
pub struct FakeDom {
    nodes: Vec<FakeNode>,
}

impl FakeDom {
    pub fn new() -> Self {
        FakeDom::default()
    }

    /// Create a detached element; infallible inherent form of the adapter op.
    pub fn new_element(&mut self, tag: &str) -> DomId {
        self.push(FakeNodeKind::Element {
            namespace: None,
            tag: tag.to_string(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        })
    }

    pub fn new_element_ns(&mut self, namespace: &str, tag: &str) -> DomId {
        self.push(FakeNodeKind::Element {
            namespace: Some(namespace.to_string()),
            tag: tag.to_string(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        })
    }

    pub fn new_text(&mut self, text: &str) -> DomId {
        self.push(FakeNodeKind::Text(text.to_string()))
    }

    fn push(&mut self, kind: FakeNodeKind) -> DomId {
        self.nodes.push(FakeNode { kind, parent: None });
        DomId(self.nodes.len() - 1)
    }

    fn node(&self, id: DomId) -> Result<&FakeNode, DomError> {
        self.nodes.get(id.0).ok_or(DomError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: DomId) -> Result<&mut FakeNode, DomError> {
        self.nodes.get_mut(id.0).ok_or(DomError::NodeNotFound(id))
    }

    fn detach(&mut self, id: DomId) -> Result<(), DomError> {
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            if let FakeNodeKind::Element { children, .. } = &mut self.node_mut(parent)?.kind {
                children.retain(|&c| c != id);
            }
            self.node_mut(id)?.parent = None;
        }
        Ok(())
    }

    // ----- inspection --------------------------------------------------------

    pub fn tag(&self, id: DomId) -> Option<&str> {
        match &self.node(id).ok()?.kind {
            FakeNodeKind::Element { tag, .. } => Some(tag),
            FakeNodeKind::Text(_) => None,
        }
    }

    pub fn namespace(&self, id: DomId) -> Option<&str> {
        match &self.node(id).ok()?.kind {
            FakeNodeKind::Element { namespace, .. } => namespace.as_deref(),
            FakeNodeKind::Text(_) => None,
        }
    }

    /// Literal text of a text node.
    pub fn text(&self, id: DomId) -> Option<&str> {
        match &self.node(id).ok()?.kind {
            FakeNodeKind::Text(text) => Some(text),
            FakeNodeKind::Element { .. } => None,
        }
    }

    pub fn attribute(&self, id: DomId, name: &str) -> Option<&str> {
        match &self.node(id).ok()?.kind {
            FakeNodeKind::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            FakeNodeKind::Text(_) => None,
        }
    }

    pub fn child_ids(&self, id: DomId) -> Vec<DomId> {
        match self.node(id).ok().map(|n| &n.kind) {
            Some(FakeNodeKind::Element { children, .. }) => children.clone(),
            _ => Vec::new(),
        }
    }

    pub fn parent(&self, id: DomId) -> Option<DomId> {
        self.node(id).ok()?.parent
    }

    /// Concatenated text of the node and all its descendants.
    pub fn text_content(&self, id: DomId) -> String {
        match self.node(id).ok().map(|n| &n.kind) {
            Some(FakeNodeKind::Text(text)) => text.clone(),
            Some(FakeNodeKind::Element { children, .. }) => children
                .clone()
                .into_iter()
                .map(|c| self.text_content(c))
                .collect(),
            None => String::new(),
        }
    }

    /// HTML-ish rendering of the subtree at `id`, attributes in name order.
    pub fn serialize(&self, id: DomId) -> String {
        match self.node(id).ok().map(|n| &n.kind) {
            Some(FakeNodeKind::Text(text)) => escape(text),
            Some(FakeNodeKind::Element {
                tag,
                attributes,
                children,
                ..
            }) => {
                let mut out = String::new();
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push_str(&format!(" {}=\"{}\"", name, escape(value)));
                }
                out.push('>');
                for &child in children {
                    out.push_str(&self.serialize(child));
                }
                out.push_str(&format!("</{}>", tag));
                out
            }
            None => String::new(),
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl Dom for FakeDom {
    fn create_element(&mut self, tag: &str) -> Result<DomId, DomError> {
        Ok(self.new_element(tag))
    }

    fn create_element_ns(&mut self, namespace: &str, tag: &str) -> Result<DomId, DomError> {
        Ok(self.new_element_ns(namespace, tag))
    }

    fn create_text_node(&mut self, text: &str) -> Result<DomId, DomError> {
        Ok(self.new_text(text))
    }

    fn set_attribute(&mut self, node: DomId, name: &str, value: &str) -> Result<(), DomError> {
        match &mut self.node_mut(node)?.kind {
            FakeNodeKind::Element { attributes, .. } => {
                attributes.insert(name.to_string(), value.to_string());
                Ok(())
            }
            FakeNodeKind::Text(_) => Err(DomError::NotAnElement(node)),
        }
    }

    fn set_text(&mut self, node: DomId, text: &str) -> Result<(), DomError> {
        match &mut self.node_mut(node)?.kind {
            FakeNodeKind::Text(current) => {
                *current = text.to_string();
                Ok(())
            }
            FakeNodeKind::Element { .. } => Err(DomError::NotAnElement(node)),
        }
    }

    fn insert_before(
        &mut self,
        parent: DomId,
        node: DomId,
        next: Option<DomId>,
    ) -> Result<(), DomError> {
        self.node(node)?;
        self.detach(node)?;
        match &mut self.node_mut(parent)?.kind {
            FakeNodeKind::Element { children, .. } => {
                let position = next
                    .and_then(|n| children.iter().position(|&c| c == n))
                    .unwrap_or(children.len());
                children.insert(position, node);
            }
            FakeNodeKind::Text(_) => return Err(DomError::NotAnElement(parent)),
        }
        self.node_mut(node)?.parent = Some(parent);
        Ok(())
    }

    fn remove(&mut self, node: DomId) -> Result<(), DomError> {
        self.detach(node)
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Clonable handle to a [FakeDom] that itself implements [Dom].
#[derive(Clone, Default)]
pub struct SharedDom(Rc<RefCell<FakeDom>>);

impl SharedDom {
    pub fn new() -> Self {
        SharedDom::default()
    }

    /// Borrow the underlying fake DOM for inspection.
    pub fn inner(&self) -> Ref<'_, FakeDom> {
        self.0.borrow()
    }

    /// Create a detached element to mount a tree under.
    pub fn element(&self, tag: &str) -> DomId {
        self.0.borrow_mut().new_element(tag)
    }

    pub fn serialize(&self, id: DomId) -> String {
        self.0.borrow().serialize(id)
    }

    pub fn text_content(&self, id: DomId) -> String {
        self.0.borrow().text_content(id)
    }
}

impl Dom for SharedDom {
    fn create_element(&mut self, tag: &str) -> Result<DomId, DomError> {
        self.0.borrow_mut().create_element(tag)
    }

    fn create_element_ns(&mut self, namespace: &str, tag: &str) -> Result<DomId, DomError> {
        self.0.borrow_mut().create_element_ns(namespace, tag)
    }

    fn create_text_node(&mut self, text: &str) -> Result<DomId, DomError> {
        self.0.borrow_mut().create_text_node(text)
    }

    fn set_attribute(&mut self, node: DomId, name: &str, value: &str) -> Result<(), DomError> {
        self.0.borrow_mut().set_attribute(node, name, value)
    }

    fn set_text(&mut self, node: DomId, text: &str) -> Result<(), DomError> {
        self.0.borrow_mut().set_text(node, text)
    }

    fn insert_before(
        &mut self,
        parent: DomId,
        node: DomId,
        next: Option<DomId>,
    ) -> Result<(), DomError> {
        self.0.borrow_mut().insert_before(parent, node, next)
    }

    fn remove(&mut self, node: DomId) -> Result<(), DomError> {
        self.0.borrow_mut().remove(node)
    }

    fn is_interactive(&self) -> bool {
        false
    }
}
