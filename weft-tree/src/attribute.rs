//! Attribute values attached to parse tree nodes
//!
//!     An attribute is a tagged value: a literal string, number or boolean, or
//!     a macro call that the renderer resolves against its variable scope chain
//!     at materialization time. The JSON form carries the tag in a `type`
//!     field, e.g. `{"type": "string", "value": "hello"}`.

use serde::{Deserialize, Serialize};

use crate::node::Span;

/// A tagged attribute value.
///
/// Literal variants are used as-is; a [MacroCall](Attribute::MacroCall) is
/// resolved by the renderer through variable lookup with the given parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Attribute {
    String {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        span: Option<Span>,
    },
    Number {
        value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        span: Option<Span>,
    },
    Boolean {
        value: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        span: Option<Span>,
    },
    #[serde(rename = "macrocall")]
    MacroCall {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        params: Vec<MacroParam>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        span: Option<Span>,
    },
}

impl Attribute {
    pub fn string(value: impl Into<String>) -> Self {
        Attribute::String {
            value: value.into(),
            span: None,
        }
    }

    pub fn number(value: f64) -> Self {
        Attribute::Number { value, span: None }
    }

    pub fn boolean(value: bool) -> Self {
        Attribute::Boolean { value, span: None }
    }

    pub fn macro_call(name: impl Into<String>, params: Vec<MacroParam>) -> Self {
        Attribute::MacroCall {
            name: name.into(),
            params,
            span: None,
        }
    }

    /// Source span of the attribute, if the parser recorded one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Attribute::String { span, .. }
            | Attribute::Number { span, .. }
            | Attribute::Boolean { span, .. }
            | Attribute::MacroCall { span, .. } => *span,
        }
    }
}

/// A parameter passed to a macro call, positional or named.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroParam {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: String,
}

impl MacroParam {
    pub fn positional(value: impl Into<String>) -> Self {
        MacroParam {
            name: None,
            value: value.into(),
        }
    }

    pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
        MacroParam {
            name: Some(name.into()),
            value: value.into(),
        }
    }
}
