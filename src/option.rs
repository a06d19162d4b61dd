//! Selectable candidates and catalog snapshots.

use std::ops::Deref;
use std::sync::Arc;

use serde_json::Value;

/// A single selectable candidate
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    /// Key of the option within a catalog snapshot
    pub value: String,
    /// Label shown to the user and used for local filtering
    pub text: String,
    /// Payload used by template bindings
    pub raw: Value,
    /// Whether the option is marked selected in the source list
    pub selected: bool,
}

impl SelectOption {
    /// Creates an option with an empty object payload
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
            raw: Value::Object(Default::default()),
            selected: false,
        }
    }

    /// Replaces the payload
    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = raw;
        self
    }

    /// Marks the option as pre-selected
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// An immutable, ordered snapshot of the currently known candidates.
///
/// Snapshots are cheap to clone and are replaced wholesale on every filter
/// or query cycle, never edited in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog(Arc<[SelectOption]>);

impl Catalog {
    /// The empty snapshot
    pub fn empty() -> Self {
        Self::default()
    }

    /// Finds an option by value
    pub fn find(&self, value: &str) -> Option<&SelectOption> {
        self.0.iter().find(|opt| opt.value == value)
    }

}

impl Deref for Catalog {
    type Target = [SelectOption];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<SelectOption>> for Catalog {
    fn from(options: Vec<SelectOption>) -> Self {
        Self(options.into())
    }
}

impl FromIterator<SelectOption> for Catalog {
    fn from_iter<I: IntoIterator<Item = SelectOption>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Case-insensitive substring filter over option labels.
///
/// An empty search returns every option. Declaration order is preserved.
pub fn filter_local(options: &[SelectOption], search: &str) -> Catalog {
    if search.is_empty() {
        return options.iter().cloned().collect();
    }
    let needle = search.to_lowercase();
    options
        .iter()
        .filter(|opt| opt.text.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
