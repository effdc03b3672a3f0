//! Parse tree node model for the weft render tree
//!
//!     This crate defines the typed, read-only node model produced by a wiki
//!     markup parser and consumed by the renderer in `weft-render`. It is pure
//!     data: nodes carry a type tag, optional element tag or text, attributes
//!     (both as a lookup map and in author order), byte-offset spans, and an
//!     ordered child list whose order is rendering order.
//!
//!     Nodes are produced once by a parser and never mutated by the renderer;
//!     children are `Rc`-shared so renderer nodes can hold references into the
//!     tree without cloning subtrees.
//!
//! Serialization
//!
//!     The whole model derives serde, and parse trees are JSON-shaped on the
//!     wire: `{"type": "element", "tag": "div", "children": [...]}`. See
//!     [ParseNode::from_json] for loading a tree from its JSON form.

pub mod attribute;
pub mod node;

pub use attribute::{Attribute, MacroParam};
pub use node::{NamedAttribute, ParseNode, Span};
