//! Output adapter boundary
//!
//!     Every output-tree mutation the engine performs goes through the [Dom]
//!     trait, so the whole rendering core runs unchanged against a real
//!     interactive surface or the headless [FakeDom](crate::fakedom::FakeDom)
//!     substitute. Backends hand out opaque [DomId] handles; the engine never
//!     holds node references of its own.

use std::fmt;

/// Handle to one node in an output backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomId(pub usize);

/// Failures reported by an output backend.
#[derive(Debug, Clone, PartialEq)]
pub enum DomError {
    /// The handle does not name a live node.
    NodeNotFound(DomId),
    /// An element-only operation was applied to a text node (or vice versa).
    NotAnElement(DomId),
    /// Backend-specific failure.
    Backend(String),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::NodeNotFound(id) => write!(f, "no output node with id {}", id.0),
            DomError::NotAnElement(id) => {
                write!(f, "output node {} is not an element", id.0)
            }
            DomError::Backend(message) => write!(f, "output backend error: {}", message),
        }
    }
}

impl std::error::Error for DomError {}

/// Capability set of an output medium.
pub trait Dom {
    fn create_element(&mut self, tag: &str) -> Result<DomId, DomError>;
    fn create_element_ns(&mut self, namespace: &str, tag: &str) -> Result<DomId, DomError>;
    fn create_text_node(&mut self, text: &str) -> Result<DomId, DomError>;
    fn set_attribute(&mut self, node: DomId, name: &str, value: &str) -> Result<(), DomError>;
    fn set_text(&mut self, node: DomId, text: &str) -> Result<(), DomError>;
    /// Insert `node` under `parent`, before `next` (append when `None`).
    fn insert_before(
        &mut self,
        parent: DomId,
        node: DomId,
        next: Option<DomId>,
    ) -> Result<(), DomError>;
    /// Detach `node` (and its subtree) from the output tree.
    fn remove(&mut self, node: DomId) -> Result<(), DomError>;
    /// Whether this backend is a real interactive surface rather than a
    /// headless substitute.
    fn is_interactive(&self) -> bool;
}
