//! Dotted-path access into option payloads.
//!
//! Templates bind rendering targets to data with expressions such as `item`
//! or `item.owner.avatar_url`. A lookup never fails: a missing key anywhere
//! along the path simply resolves to nothing.

use std::borrow::Cow;

use serde_json::Value;

/// Walks `value` along a `.`-delimited `path`.
///
/// Objects are indexed by key, arrays by numeric segment. An empty path
/// returns `value` itself.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, key| match current {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Renders a scalar payload value the way it would appear as text.
///
/// Strings are returned as-is, numbers and booleans through their display
/// form. Null, arrays and objects have no text form.
pub fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

/// A parsed field-binding expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// `item`: the whole payload, only meaningful when it is a bare string
    Whole,
    /// `item.<path>`: a dotted path into a structured payload
    Path(String),
}

impl Binding {
    /// Parses a binding expression, returning `None` for anything that does
    /// not start with `item`.
    pub fn parse(expr: &str) -> Option<Self> {
        if expr == "item" {
            Some(Self::Whole)
        } else {
            expr.strip_prefix("item.").map(|p| Self::Path(p.to_string()))
        }
    }

    /// Resolves the binding against an option payload
    pub fn resolve<'a>(&self, data: &'a Value) -> Option<Cow<'a, str>> {
        match self {
            Self::Whole => match data {
                Value::String(s) => Some(Cow::Borrowed(s.as_str())),
                _ => None,
            },
            Self::Path(path) => lookup(data, path).and_then(scalar_text),
        }
    }
}
