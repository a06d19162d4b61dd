//! Configuration options for betterselect.
//!
//! [`SelectOptions`] configures both the control (mode, remote lookup,
//! debounce, texts) and the terminal front-end (height, colors, source).
//! Declarations in a [`SelectSource`] take precedence over the matching
//! options.

use std::path::PathBuf;
use std::time::Duration;

use derive_builder::Builder;

use crate::controller::ControllerConfig;
use crate::query::RemoteConfig;
use crate::selection::SelectMode;
use crate::source::SelectSource;

/// bsel - searchable select in the terminal
///
/// Reads options from stdin (one per line, `value<TAB>text` or `text`) or from
/// a JSON/RON source file, lets the user pick one or many, and prints the
/// submitted value.
#[derive(Builder, Debug, Clone)]
#[builder(build_fn(name = "final_build"))]
#[builder(default)]
#[cfg_attr(feature = "cli", derive(clap::Parser))]
#[cfg_attr(
    feature = "cli",
    command(name = "bsel", args_override_self = true, verbatim_doc_comment, version, about)
)]
pub struct SelectOptions {
    //  --- Selection ---
    /// Allow selecting several values
    #[cfg_attr(feature = "cli", arg(short, long, help_heading = "Selection"))]
    pub multi: bool,

    /// Name of the submitted field
    #[cfg_attr(feature = "cli", arg(long, default_value = "value", help_heading = "Selection"))]
    pub name: String,

    /// Initial search text
    #[cfg_attr(feature = "cli", arg(short, long, help_heading = "Selection"))]
    pub query: Option<String>,

    //  --- Remote ---
    /// Remote lookup URL, `{query}` is replaced by the encoded search text
    ///
    /// Example: `--url 'https://api.example.com/users?q={query}'`
    #[cfg_attr(feature = "cli", arg(short, long, help_heading = "Remote"))]
    pub url: Option<String>,

    /// Dotted path of the record list inside the response body
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Remote"))]
    pub items_path: Option<String>,

    /// Quiet period before a remote query is sent, in milliseconds
    #[cfg_attr(feature = "cli", arg(long, default_value_t = 200, help_heading = "Remote"))]
    pub debounce_ms: u64,

    //  --- Source ---
    /// Read the control description from a JSON or RON file instead of stdin
    #[cfg_attr(feature = "cli", arg(short, long, help_heading = "Source"))]
    pub source: Option<PathBuf>,

    //  --- Display ---
    /// Placeholder of the empty search input
    #[cfg_attr(feature = "cli", arg(long, default_value = "Type to search...", help_heading = "Display"))]
    pub placeholder: String,

    /// Text shown while a remote query is pending
    #[cfg_attr(feature = "cli", arg(long, default_value = "Loading...", help_heading = "Display"))]
    pub loading_text: String,

    /// Height of the control, in lines or as a percentage of the terminal
    #[cfg_attr(feature = "cli", arg(long, default_value = "40%", help_heading = "Display"))]
    pub height: String,

    /// Disable colors
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Display"))]
    pub no_color: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            multi: false,
            name: String::from("value"),
            query: None,
            url: None,
            items_path: None,
            debounce_ms: 200,
            source: None,
            placeholder: String::from("Type to search..."),
            loading_text: String::from("Loading..."),
            height: String::from("40%"),
            no_color: false,
        }
    }
}

impl SelectOptionsBuilder {
    /// Builds the SelectOptions from the builder
    pub fn build(&mut self) -> Result<SelectOptions, SelectOptionsBuilderError> {
        self.final_build()
    }
}

impl SelectOptions {
    /// Folds the declarations of `source` into the options
    pub fn merge_source(mut self, source: &SelectSource) -> Self {
        if source.multiple {
            self.multi = true;
        }
        if source.url.is_some() {
            self.url = source.url.clone();
        }
        if source.items.is_some() {
            self.items_path = source.items.clone();
        }
        if !source.name.is_empty() {
            self.name = source.name.clone();
        }
        self
    }

    /// Selection mode
    pub fn mode(&self) -> SelectMode {
        if self.multi { SelectMode::Multi } else { SelectMode::Single }
    }

    /// Remote configuration, when a lookup URL is set
    pub fn remote(&self) -> Option<RemoteConfig> {
        self.url.as_ref().map(|url| RemoteConfig {
            url_template: url.clone(),
            items_path: self.items_path.clone(),
        })
    }

    /// Controller configuration
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            name: self.name.clone(),
            mode: self.mode(),
            remote: self.url.is_some(),
            debounce: Duration::from_millis(self.debounce_ms),
            placeholder: self.placeholder.clone(),
            loading_text: self.loading_text.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builder_defaults() {
        let opts = SelectOptionsBuilder::default().multi(true).build().unwrap();
        assert_eq!(opts.mode(), SelectMode::Multi);
        assert_eq!(opts.debounce_ms, 200);
        assert_eq!(opts.name, "value");
        assert!(opts.remote().is_none());
    }

    #[test]
    fn source_declarations_win() {
        let source = SelectSource {
            name: "tags".into(),
            multiple: true,
            url: Some("/t?q={query}".into()),
            items: Some("data".into()),
            ..Default::default()
        };
        let opts = SelectOptions::default().merge_source(&source);
        let config = opts.controller_config();
        assert_eq!(config.name, "tags");
        assert_eq!(config.mode, SelectMode::Multi);
        assert!(config.remote);
        assert_eq!(opts.remote().unwrap().items_path.as_deref(), Some("data"));
    }
}
