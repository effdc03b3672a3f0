//! Error types for the widget tree
//!
//!     All renderer failures are caught at the widget-node boundary and
//!     converted to a degraded render plus a [Diagnostic]; none of them abort
//!     the whole tree. Only an output-adapter failure while materializing the
//!     root is fatal to a pass.

use std::fmt;

use crate::dom::DomError;
use crate::tree::WidgetId;

/// Failures that degrade a single widget's rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetError {
    /// The parse node's type tag has no registered widget class. The node
    /// renders as an empty placeholder; siblings proceed.
    UnknownNodeType { type_name: String },
    /// Macro or variable substitution failed while resolving an attribute.
    /// The node renders with the default (empty) value for that attribute.
    AttributeResolution { attribute: String, reason: String },
    /// Widget-specific setup failed (missing required attribute, malformed
    /// input). The node renders empty.
    Setup { widget: String, reason: String },
    /// The output backend failed. Aborts materialization of the current
    /// subtree only; sibling subtrees are still attempted.
    OutputAdapter(DomError),
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetError::UnknownNodeType { type_name } => {
                write!(f, "no widget registered for node type '{}'", type_name)
            }
            WidgetError::AttributeResolution { attribute, reason } => {
                write!(f, "could not resolve attribute '{}': {}", attribute, reason)
            }
            WidgetError::Setup { widget, reason } => {
                write!(f, "setup of '{}' widget failed: {}", widget, reason)
            }
            WidgetError::OutputAdapter(error) => write!(f, "output adapter failed: {}", error),
        }
    }
}

impl std::error::Error for WidgetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WidgetError::OutputAdapter(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DomError> for WidgetError {
    fn from(error: DomError) -> Self {
        WidgetError::OutputAdapter(error)
    }
}

/// One degraded-render record. Collected on the tree, drained by the caller.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The widget node that degraded.
    pub widget: WidgetId,
    /// Type tag of the parse node being rendered.
    pub node_type: String,
    pub error: WidgetError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "widget '{}': {}", self.node_type, self.error)
    }
}
