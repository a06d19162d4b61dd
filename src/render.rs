//! Rendering of catalog entries and selection pills.
//!
//! The controller never draws anything itself: it asks a [`Renderer`] for a
//! [`RenderedNode`] per option and per pill and assembles a [`View`] that a
//! host (the terminal front-end, a test, ...) can display.

use crate::option::SelectOption;
use crate::selection::SelectMode;
use crate::template::{Bindings, RenderedNode, Template};

/// Accessibility role of the option list
pub const LIST_ROLE: &str = "listbox";
/// Accessibility role of each list entry
pub const ITEM_ROLE: &str = "option";
/// Label of the pill remove affordance
pub const REMOVE_LABEL: &str = "Remove";

/// Per-item rendering context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemContext {
    /// Selection mode of the control
    pub mode: SelectMode,
    /// Whether the option is currently selected
    pub selected: bool,
}

/// Turns options into rendered nodes
pub trait Renderer: Send + Sync {
    /// Renders one catalog entry
    fn render_item(&self, option: &SelectOption, ctx: ItemContext) -> RenderedNode;
    /// Renders the content of one selection pill
    fn render_pill(&self, option: &SelectOption) -> RenderedNode;
}

/// Checkbox and label for multi-select, label only for single-select
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRenderer;

impl Renderer for DefaultRenderer {
    fn render_item(&self, option: &SelectOption, ctx: ItemContext) -> RenderedNode {
        let label = RenderedNode::Text(option.text.clone());
        match ctx.mode {
            SelectMode::Single => label,
            SelectMode::Multi => RenderedNode::Group(vec![RenderedNode::Checkbox { checked: ctx.selected }, label]),
        }
    }

    fn render_pill(&self, option: &SelectOption) -> RenderedNode {
        RenderedNode::Text(option.text.clone())
    }
}

/// Host-supplied templates, falling back to [`DefaultRenderer`] for any
/// template that is absent
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer {
    /// Template for catalog entries
    pub item: Option<Template>,
    /// Template for selection pills
    pub pill: Option<Template>,
}

impl Renderer for TemplateRenderer {
    fn render_item(&self, option: &SelectOption, ctx: ItemContext) -> RenderedNode {
        let Some(template) = &self.item else {
            return DefaultRenderer.render_item(option, ctx);
        };
        template.instantiate(Bindings {
            data: &option.raw,
            checkbox: (ctx.mode == SelectMode::Multi).then_some(ctx.selected),
        })
    }

    fn render_pill(&self, option: &SelectOption) -> RenderedNode {
        let Some(template) = &self.pill else {
            return DefaultRenderer.render_pill(option);
        };
        template.instantiate(Bindings {
            data: &option.raw,
            checkbox: None,
        })
    }
}

/// One rendered catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    /// Value of the option
    pub value: String,
    /// Rendered content
    pub content: RenderedNode,
    /// Whether the option is selected
    pub selected: bool,
    /// Whether the keyboard highlight is on this entry
    pub highlighted: bool,
}

impl RenderedItem {
    /// Accessibility role of the entry
    pub fn role(&self) -> &'static str {
        ITEM_ROLE
    }

    /// Value of the `aria-selected` attribute
    pub fn aria_selected(&self) -> &'static str {
        if self.selected { "true" } else { "false" }
    }
}

/// One rendered selection pill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPill {
    /// Value of the selected option, also the target of the remove affordance
    pub value: String,
    /// Rendered content
    pub content: RenderedNode,
}

impl RenderedPill {
    /// Accessible label of the remove affordance
    pub fn remove_label(&self) -> &'static str {
        REMOVE_LABEL
    }
}

/// Everything a host needs to draw the control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Name of the submission field
    pub name: String,
    /// Mirrored submission value
    pub submission: String,
    /// Current search text
    pub search_text: String,
    /// Placeholder shown when the search text is empty
    pub placeholder: String,
    /// Whether the dropdown is open
    pub open: bool,
    /// Loading indicator text while a remote query is pending
    pub loading: Option<String>,
    /// Rendered catalog entries
    pub items: Vec<RenderedItem>,
    /// Rendered selection pills (multi-select only)
    pub pills: Vec<RenderedPill>,
}

impl View {
    /// Accessibility role of the option list
    pub fn role(&self) -> &'static str {
        LIST_ROLE
    }
}
