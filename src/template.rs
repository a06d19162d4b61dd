//! Declarative item and pill templates.
//!
//! A template is a small tree of nodes. Some nodes carry a field binding
//! (`item`, `item.name`, ...) that is resolved against the option payload
//! when the template is instantiated; nodes whose binding resolves to
//! nothing keep their static content.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field::Binding;

/// One node of a template fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateNode {
    /// Static text
    Literal(String),
    /// Text bound to a field, `text` is shown when the binding is absent
    Text {
        /// Binding expression
        bind: String,
        /// Static fallback content
        #[serde(default)]
        text: String,
    },
    /// Image whose source is bound to a field
    Image {
        /// Binding expression
        bind: String,
        /// Static fallback source
        #[serde(default)]
        src: String,
    },
    /// Link whose target is bound to a field
    Link {
        /// Binding expression
        bind: String,
        /// Static fallback target
        #[serde(default)]
        href: String,
        /// Link content
        #[serde(default)]
        children: Vec<TemplateNode>,
    },
    /// Placeholder replaced by the selection checkbox in multi-select items
    Checkbox,
    /// A sequence of nodes
    Group(Vec<TemplateNode>),
}

/// A template fragment, tagged for item or pill rendering in the host markup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template {
    /// Top-level nodes
    pub nodes: Vec<TemplateNode>,
}

/// Output of rendering an option or a pill
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedNode {
    /// Plain text
    Text(String),
    /// An image reference
    Image {
        /// Source of the image
        src: String,
    },
    /// A link wrapping other nodes
    Link {
        /// Target of the link
        href: String,
        /// Link content
        children: Vec<RenderedNode>,
    },
    /// Selection checkbox
    Checkbox {
        /// Whether the owning option is selected
        checked: bool,
    },
    /// A sequence of nodes
    Group(Vec<RenderedNode>),
}

impl RenderedNode {
    /// Concatenated text content, images and checkboxes excluded
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(t) => out.push_str(t),
            Self::Link { children, .. } | Self::Group(children) => {
                children.iter().for_each(|c| c.collect_text(out));
            }
            Self::Image { .. } | Self::Checkbox { .. } => {}
        }
    }
}

/// Per-instantiation inputs of a template
#[derive(Debug, Clone, Copy)]
pub struct Bindings<'a> {
    /// Option payload
    pub data: &'a Value,
    /// `Some(checked)` when checkbox placeholders should be filled (multi-select),
    /// `None` to drop them
    pub checkbox: Option<bool>,
}

impl Template {
    /// Creates a template from nodes
    pub fn new(nodes: Vec<TemplateNode>) -> Self {
        Self { nodes }
    }

    /// Instantiates the template
    pub fn instantiate(&self, bindings: Bindings<'_>) -> RenderedNode {
        RenderedNode::Group(instantiate_all(&self.nodes, bindings))
    }
}

fn instantiate_all(nodes: &[TemplateNode], bindings: Bindings<'_>) -> Vec<RenderedNode> {
    nodes.iter().filter_map(|n| instantiate(n, bindings)).collect()
}

fn bound(bind: &str, fallback: &str, data: &Value) -> String {
    Binding::parse(bind)
        .and_then(|b| b.resolve(data).map(|v| v.into_owned()))
        .unwrap_or_else(|| fallback.to_string())
}

fn instantiate(node: &TemplateNode, bindings: Bindings<'_>) -> Option<RenderedNode> {
    let rendered = match node {
        TemplateNode::Literal(text) => RenderedNode::Text(text.clone()),
        TemplateNode::Text { bind, text } => RenderedNode::Text(bound(bind, text, bindings.data)),
        TemplateNode::Image { bind, src } => RenderedNode::Image {
            src: bound(bind, src, bindings.data),
        },
        TemplateNode::Link { bind, href, children } => RenderedNode::Link {
            href: bound(bind, href, bindings.data),
            children: instantiate_all(children, bindings),
        },
        TemplateNode::Checkbox => RenderedNode::Checkbox {
            checked: bindings.checkbox?,
        },
        TemplateNode::Group(children) => RenderedNode::Group(instantiate_all(children, bindings)),
    };
    Some(rendered)
}
