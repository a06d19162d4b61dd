use std::fmt::Display;

/// Result of an interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOutput {
    /// Name of the submission field
    pub name: String,
    /// Submission value: the sole value, or the values joined by commas
    pub value: String,
    /// Selected values in order
    pub values: Vec<String>,
    /// Search text when the session ended
    pub query: String,
    /// Whether the user left without submitting
    pub is_abort: bool,
}

impl Display for SelectOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}
