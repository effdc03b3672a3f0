//! Parse tree nodes
//!
//!     A [ParseNode] is one element of the tree a markup parser hands to the
//!     renderer. The `node_type` tag is always present and selects the widget
//!     class that renders the node; everything else is optional and depends on
//!     the kind of node (`tag` on element nodes, `text` on text nodes, and so
//!     on).
//!
//!     Attributes are carried twice: in a map for lookup and in
//!     `ordered_attributes` preserving author order. Renderers iterate
//!     [attribute_pairs](ParseNode::attribute_pairs), which prefers author
//!     order and falls back to name order so resolution is deterministic.
//!
//!     The fluent constructors exist for building trees in code, chiefly from
//!     tests and fixtures:
//!
//!     ```rust,ignore
//!     let tree = ParseNode::element("div")
//!         .attr("class", "note")
//!         .child(ParseNode::text("hello"));
//!     ```

use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;

/// Byte-offset span into the markup source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

/// An attribute together with its name, in author order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedAttribute {
    pub name: String,
    pub value: Attribute,
}

/// One node of a parse tree. Read-only input to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseNode {
    /// Type tag selecting the widget class that renders this node.
    #[serde(rename = "type")]
    pub node_type: String,
    /// Element tag, for `element` nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Literal text, for `text` nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, Attribute>,
    /// Attributes in the order the author wrote them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ordered_attributes: Vec<NamedAttribute>,
    /// Ordered children; order is rendering order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Rc<ParseNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_block: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_self_closing: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_macro_definition: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ParseNode {
    pub fn new(node_type: impl Into<String>) -> Self {
        ParseNode {
            node_type: node_type.into(),
            tag: None,
            text: None,
            attributes: HashMap::new(),
            ordered_attributes: Vec::new(),
            children: Vec::new(),
            span: None,
            is_block: false,
            is_self_closing: false,
            is_macro_definition: false,
        }
    }

    /// An `element` node with the given element tag.
    pub fn element(tag: impl Into<String>) -> Self {
        let mut node = ParseNode::new("element");
        node.tag = Some(tag.into());
        node
    }

    /// A `text` node with the given literal text.
    pub fn text(text: impl Into<String>) -> Self {
        let mut node = ParseNode::new("text");
        node.text = Some(text.into());
        node
    }

    /// A `container` node: renders nothing of its own, only its children.
    pub fn container() -> Self {
        ParseNode::new("container")
    }

    /// Add an attribute, preserving author order.
    pub fn attribute(mut self, name: impl Into<String>, value: Attribute) -> Self {
        let name = name.into();
        self.attributes.insert(name.clone(), value.clone());
        self.ordered_attributes.push(NamedAttribute { name, value });
        self
    }

    /// Shorthand for a literal string attribute.
    pub fn attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attribute(name, Attribute::string(value))
    }

    pub fn child(mut self, node: ParseNode) -> Self {
        self.children.push(Rc::new(node));
        self
    }

    pub fn with_children(mut self, nodes: Vec<ParseNode>) -> Self {
        self.children.extend(nodes.into_iter().map(Rc::new));
        self
    }

    pub fn spanned(mut self, start: usize, end: usize) -> Self {
        self.span = Some(Span::new(start, end));
        self
    }

    pub fn block(mut self) -> Self {
        self.is_block = true;
        self
    }

    pub fn get_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Attributes as `(name, value)` pairs in resolution order: author order
    /// when the parser recorded it, name order otherwise.
    pub fn attribute_pairs(&self) -> Vec<(&str, &Attribute)> {
        if !self.ordered_attributes.is_empty() {
            self.ordered_attributes
                .iter()
                .map(|a| (a.name.as_str(), &a.value))
                .collect()
        } else {
            let mut pairs: Vec<(&str, &Attribute)> = self
                .attributes
                .iter()
                .map(|(name, value)| (name.as_str(), value))
                .collect();
            pairs.sort_by_key(|(name, _)| *name);
            pairs
        }
    }

    /// Load a parse tree from its JSON form.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
