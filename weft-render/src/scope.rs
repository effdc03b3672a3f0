//! Variable bindings and textual substitution
//!
//!     A widget node's scope is its local map of [VariableBinding]s overlaid
//!     on its parent's scope; the chain walk itself lives on
//!     [WidgetTree](crate::tree::WidgetTree). This module holds the binding
//!     types and the substitution machinery they share.
//!
//!     Substitution is textual and single-pass, never re-entrant: a `$param$`
//!     placeholder is replaced by its bound value once, and whatever that
//!     value contains is not expanded again. Macro definitions additionally
//!     get `$(variable)$` references replaced from the consulting scope, also
//!     in one pass.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use weft_tree::MacroParam;

static PARAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([A-Za-z0-9_][A-Za-z0-9\-_]*)\$").expect("parameter pattern"));

static VARIABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\(([A-Za-z0-9_][A-Za-z0-9\-_]*)\)\$").expect("variable pattern"));

/// A parameter declared by a variable or macro definition.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableParam {
    pub name: String,
    pub default: Option<String>,
}

impl VariableParam {
    pub fn new(name: impl Into<String>) -> Self {
        VariableParam {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(name: impl Into<String>, default: impl Into<String>) -> Self {
        VariableParam {
            name: name.into(),
            default: Some(default.into()),
        }
    }
}

/// One entry in a widget node's local scope.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableBinding {
    pub value: String,
    pub params: Vec<VariableParam>,
    /// Set via a macro-definition pragma; such values also get `$(variable)$`
    /// substitution when read.
    pub is_macro_definition: bool,
}

impl VariableBinding {
    /// A plain variable with no parameters.
    pub fn plain(value: impl Into<String>) -> Self {
        VariableBinding {
            value: value.into(),
            params: Vec::new(),
            is_macro_definition: false,
        }
    }

    pub fn macro_definition(value: impl Into<String>, params: Vec<VariableParam>) -> Self {
        VariableBinding {
            value: value.into(),
            params,
            is_macro_definition: true,
        }
    }
}

/// Options for a variable lookup: actual parameters and a fallback value.
#[derive(Debug, Clone, Default)]
pub struct VariableOptions {
    pub params: Vec<MacroParam>,
    pub default: Option<String>,
}

impl VariableOptions {
    pub fn with_params(params: Vec<MacroParam>) -> Self {
        VariableOptions {
            params,
            default: None,
        }
    }

    pub fn with_default(default: impl Into<String>) -> Self {
        VariableOptions {
            params: Vec::new(),
            default: Some(default.into()),
        }
    }
}

/// Result of a variable lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableInfo {
    /// Binding value with parameters (and, for macro definitions, variables)
    /// substituted.
    pub text: String,
    /// Whether a binding was found anywhere in the chain.
    pub found: bool,
}

/// Bind actual parameter values to declared parameters.
///
/// Named actuals claim their parameter first; remaining declared parameters
/// are filled positionally from the unnamed actuals in order; anything still
/// unbound falls back to its declared default, or empty.
pub fn bind_parameters(
    declared: &[VariableParam],
    actual: &[MacroParam],
) -> Vec<(String, String)> {
    let mut values: Vec<Option<String>> = vec![None; declared.len()];

    for param in actual.iter().filter(|p| p.name.is_some()) {
        let name = param.name.as_deref().unwrap_or_default();
        if let Some(index) = declared.iter().position(|d| d.name == name) {
            values[index] = Some(param.value.clone());
        }
    }

    let mut positional = actual.iter().filter(|p| p.name.is_none());
    for (index, declared_param) in declared.iter().enumerate() {
        if values[index].is_none() {
            values[index] = positional
                .next()
                .map(|p| p.value.clone())
                .or_else(|| declared_param.default.clone());
        }
    }

    declared
        .iter()
        .zip(values)
        .map(|(d, v)| (d.name.clone(), v.unwrap_or_default()))
        .collect()
}

/// Replace `$name$` placeholders with bound parameter values, one pass.
/// Placeholders with no binding are left untouched.
pub fn substitute_parameters(text: &str, bound: &[(String, String)]) -> String {
    let lookup: HashMap<&str, &str> = bound
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    PARAM_RE
        .replace_all(text, |caps: &Captures| match lookup.get(&caps[1]) {
            Some(value) => (*value).to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Replace `$(name)$` references through `lookup`, one pass. References the
/// lookup cannot resolve are left untouched.
pub fn substitute_variables<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    VARIABLE_RE
        .replace_all(text, |caps: &Captures| match lookup(&caps[1]) {
            Some(value) => value,
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_positional_and_named() {
        let declared = vec![
            VariableParam::new("first"),
            VariableParam::new("second"),
            VariableParam::with_default("third", "fallback"),
        ];
        let actual = vec![
            MacroParam::named("second", "B"),
            MacroParam::positional("A"),
        ];
        let bound = bind_parameters(&declared, &actual);
        assert_eq!(
            bound,
            vec![
                ("first".to_string(), "A".to_string()),
                ("second".to_string(), "B".to_string()),
                ("third".to_string(), "fallback".to_string()),
            ]
        );
    }

    #[test]
    fn test_bind_missing_without_default_is_empty() {
        let declared = vec![VariableParam::new("only")];
        let bound = bind_parameters(&declared, &[]);
        assert_eq!(bound, vec![("only".to_string(), String::new())]);
    }

    #[test]
    fn test_substitute_parameters() {
        let bound = vec![("name".to_string(), "world".to_string())];
        assert_eq!(
            substitute_parameters("hello $name$!", &bound),
            "hello world!"
        );
        // Unbound placeholders stay put.
        assert_eq!(substitute_parameters("$other$", &bound), "$other$");
    }

    #[test]
    fn test_substitution_is_single_pass() {
        // The substituted value itself contains a placeholder; it must not be
        // expanded again.
        let bound = vec![
            ("a".to_string(), "$b$".to_string()),
            ("b".to_string(), "deep".to_string()),
        ];
        assert_eq!(substitute_parameters("$a$", &bound), "$b$");
    }

    #[test]
    fn test_substitute_variables() {
        let result = substitute_variables("x=$(x)$ y=$(y)$", |name| {
            (name == "x").then(|| "1".to_string())
        });
        assert_eq!(result, "x=1 y=$(y)$");
    }
}
