//! The set of chosen values.

use indexmap::IndexMap;

use crate::option::SelectOption;

/// Whether the control holds one value or many
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectMode {
    /// At most one value
    #[default]
    Single,
    /// Any number of values, kept in insertion order
    Multi,
}

/// What a toggle did to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    /// The value was added
    Added,
    /// The value was removed
    Removed,
}

/// Chosen values mapped to the option they were picked from.
///
/// Entries survive catalog replacements: an option stays selected even after
/// a new search filters it out of view.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    mode: SelectMode,
    entries: IndexMap<String, SelectOption>,
}

impl Selection {
    /// Creates an empty selection
    pub fn new(mode: SelectMode) -> Self {
        Self {
            mode,
            entries: IndexMap::new(),
        }
    }

    /// Seeds the selection from options pre-marked selected in the source.
    ///
    /// In single mode only the last marked option is kept, the way a native
    /// single-value list resolves conflicting `selected` flags.
    pub fn seeded<'a>(mode: SelectMode, options: impl IntoIterator<Item = &'a SelectOption>) -> Self {
        let mut selection = Self::new(mode);
        for opt in options.into_iter().filter(|o| o.selected) {
            if mode == SelectMode::Single {
                selection.entries.clear();
            }
            selection.entries.insert(opt.value.clone(), opt.clone());
        }
        selection
    }

    /// The selection mode
    pub fn mode(&self) -> SelectMode {
        self.mode
    }

    /// Applies a toggle for `option`.
    ///
    /// Single mode always replaces the whole selection with `option`. Multi
    /// mode removes it when present and appends it otherwise.
    pub fn toggle(&mut self, option: &SelectOption) -> Toggled {
        match self.mode {
            SelectMode::Single => {
                self.entries.clear();
                self.entries.insert(option.value.clone(), option.clone());
                Toggled::Added
            }
            SelectMode::Multi => {
                if self.entries.shift_remove(&option.value).is_some() {
                    Toggled::Removed
                } else {
                    self.entries.insert(option.value.clone(), option.clone());
                    Toggled::Added
                }
            }
        }
    }

    /// Removes `value`, preserving the order of the remaining entries
    pub fn remove(&mut self, value: &str) -> Option<SelectOption> {
        self.entries.shift_remove(value)
    }

    /// Whether `value` is selected
    pub fn contains(&self, value: &str) -> bool {
        self.entries.contains_key(value)
    }

    /// Number of selected values
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selected values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Selected options in insertion order
    pub fn options(&self) -> impl Iterator<Item = &SelectOption> {
        self.entries.values()
    }

    /// The string a plain form field would submit for this selection:
    /// the sole value (or empty) in single mode, comma-joined values in multi mode.
    pub fn submission_value(&self) -> String {
        match self.mode {
            SelectMode::Single => self.values().next().unwrap_or_default().to_string(),
            SelectMode::Multi => self.values().collect::<Vec<_>>().join(","),
        }
    }
}
