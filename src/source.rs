//! The host markup a control is attached to.
//!
//! A [`SelectSource`] plays the role of the wrapped choice list: it names the
//! submission field, declares the options (with optional embedded payloads),
//! switches on multi-value or remote mode and carries the item and pill
//! templates. Sources can be written as JSON or RON, or read as plain lines.

use std::io::BufRead;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::option::SelectOption;
use crate::query::RemoteConfig;
use crate::render::TemplateRenderer;
use crate::selection::SelectMode;
use crate::template::Template;

/// Errors raised while loading a source
#[derive(Error, Debug)]
pub enum SourceError {
    /// The file could not be read
    #[error("could not read source: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid JSON markup
    #[error("invalid JSON source: {0}")]
    Json(#[from] serde_json::Error),
    /// Invalid RON markup
    #[error("invalid RON source: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// One declared option
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceOption {
    /// Submitted value, defaults to the text
    pub value: Option<String>,
    /// Label
    pub text: String,
    /// Pre-selected
    pub selected: bool,
    /// Embedded JSON payload for template bindings
    pub item: Option<String>,
}

/// What a template fragment is used for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateTarget {
    /// Catalog entries
    #[default]
    Item,
    /// Selection pills
    Pill,
}

/// A tagged template fragment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSpec {
    /// Target of the fragment
    #[serde(rename = "for", default)]
    pub target: TemplateTarget,
    /// Fragment content
    pub nodes: Template,
}

/// Declarative description of a control
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectSource {
    /// Name of the submission field
    pub name: String,
    /// Multi-value mode
    pub multiple: bool,
    /// Remote lookup URL template containing `{query}`
    pub url: Option<String>,
    /// Dotted path of the record list in remote responses
    pub items: Option<String>,
    /// Declared options
    pub options: Vec<SourceOption>,
    /// Item and pill templates
    pub templates: Vec<TemplateSpec>,
}

impl SelectSource {
    /// Parses JSON markup
    pub fn from_json_str(s: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parses RON markup
    pub fn from_ron_str(s: &str) -> Result<Self, SourceError> {
        Ok(ron::from_str(s)?)
    }

    /// Loads a file, as RON when it has a `.ron` extension and as JSON otherwise
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => Self::from_ron_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    /// Reads one option per non-empty line, either `value<TAB>text` or just `text`
    pub fn from_lines(name: &str, reader: impl BufRead) -> Result<Self, SourceError> {
        let mut options = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let (value, text) = match line.split_once('\t') {
                Some((value, text)) => (Some(value.to_string()), text.to_string()),
                None => (None, line.to_string()),
            };
            options.push(SourceOption {
                value,
                text,
                ..Default::default()
            });
        }
        trace!("read {} options from lines", options.len());
        Ok(Self {
            name: name.to_string(),
            options,
            ..Default::default()
        })
    }

    /// Selection mode declared by the markup
    pub fn mode(&self) -> SelectMode {
        if self.multiple { SelectMode::Multi } else { SelectMode::Single }
    }

    /// Remote configuration, when a lookup URL is declared
    pub fn remote(&self) -> Option<RemoteConfig> {
        self.url.as_ref().map(|url| RemoteConfig {
            url_template: url.clone(),
            items_path: self.items.clone(),
        })
    }

    /// Declared options with their payloads parsed
    pub fn select_options(&self) -> Vec<SelectOption> {
        self.options.iter().map(to_select_option).collect()
    }

    /// Renderer built from the declared templates, the last fragment per target wins
    pub fn renderer(&self) -> TemplateRenderer {
        let mut renderer = TemplateRenderer::default();
        for fragment in &self.templates {
            let slot = match fragment.target {
                TemplateTarget::Item => &mut renderer.item,
                TemplateTarget::Pill => &mut renderer.pill,
            };
            *slot = Some(fragment.nodes.clone());
        }
        renderer
    }
}

fn to_select_option(source: &SourceOption) -> SelectOption {
    let raw = match source.item.as_deref() {
        None | Some("") => Value::Object(Default::default()),
        Some(payload) => serde_json::from_str(payload).unwrap_or_else(|e| {
            warn!("ignoring malformed payload for option {:?}: {e}", source.text);
            Value::Object(Default::default())
        }),
    };
    let value = source.value.clone().unwrap_or_else(|| source.text.clone());
    SelectOption::new(value, source.text.clone())
        .with_raw(raw)
        .with_selected(source.selected)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::template::TemplateNode;
    use serde_json::json;
    use std::io::Cursor;

    #[test]
    fn json_markup() {
        let source = SelectSource::from_json_str(
            r#"{
                "name": "users",
                "multiple": true,
                "url": "/api/users?q={query}",
                "items": "data.users",
                "options": [{"value": "1", "text": "Ada", "selected": true, "item": "{\"avatar\": \"a.png\"}"}],
                "templates": [{"for": "pill", "nodes": [{"text": {"bind": "item.avatar"}}]}]
            }"#,
        )
        .unwrap();
        assert_eq!(source.mode(), SelectMode::Multi);
        assert_eq!(
            source.remote(),
            Some(RemoteConfig {
                url_template: "/api/users?q={query}".into(),
                items_path: Some("data.users".into()),
            })
        );
        let options = source.select_options();
        assert_eq!(options[0].raw, json!({"avatar": "a.png"}));
        assert!(options[0].selected);
        let renderer = source.renderer();
        assert!(renderer.item.is_none());
        assert_eq!(
            renderer.pill,
            Some(Template::new(vec![TemplateNode::Text {
                bind: "item.avatar".into(),
                text: String::new()
            }]))
        );
    }

    #[test]
    fn ron_markup() {
        let source = SelectSource::from_ron_str(
            r#"(
                name: "fruit",
                options: [(text: "Apple"), (value: Some("b"), text: "Banana")],
            )"#,
        )
        .unwrap();
        let options = source.select_options();
        assert_eq!(options[0].value, "Apple");
        assert_eq!(options[1].value, "b");
        assert_eq!(source.mode(), SelectMode::Single);
        assert!(source.remote().is_none());
    }

    #[test]
    fn lines_with_and_without_values() {
        let source = SelectSource::from_lines("f", Cursor::new("a\tApple\n\nBanana\r\n")).unwrap();
        let options = source.select_options();
        assert_eq!(options.len(), 2);
        assert_eq!((options[0].value.as_str(), options[0].text.as_str()), ("a", "Apple"));
        assert_eq!((options[1].value.as_str(), options[1].text.as_str()), ("Banana", "Banana"));
    }

    #[test]
    fn malformed_payload_becomes_empty_object() {
        let source = SelectSource {
            options: vec![SourceOption {
                text: "x".into(),
                item: Some("{not json".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(source.select_options()[0].raw, json!({}));
    }
}
