//! Drawing of a [`View`] with ratatui.
//!
//! The layout is computed by [`ControlLayout::compute`] and shared with the
//! mouse hit-testing in the app, so that what is drawn and what is clicked
//! always agree.

use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};
use unicode_display_width::width as display_width;

use crate::render::{RenderedItem, View};
use crate::template::RenderedNode;
use crate::theme::ColorTheme;

/// Prefix of the search input
pub const PROMPT: &str = "> ";
/// Marker of the highlighted line
pub const CURSOR: &str = ">";
/// Remove affordance of the pills
pub const REMOVE_MARK: &str = "×";

fn width_u16(s: &str) -> u16 {
    u16::try_from(display_width(s)).unwrap_or(u16::MAX)
}

/// Screen areas of the control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlLayout {
    /// Pill row, present when something is selected in multi mode
    pub pills: Option<Rect>,
    /// Search input row
    pub input: Rect,
    /// Option list
    pub list: Rect,
}

impl ControlLayout {
    /// Splits `area` for `view`
    pub fn compute(area: Rect, view: &View) -> Self {
        let bottom = area.bottom();
        let mut y = area.y;
        let mut take = |height: u16| {
            let height = height.min(bottom.saturating_sub(y));
            let rect = Rect::new(area.x, y, area.width, height);
            y += height;
            rect
        };
        let pills = (!view.pills.is_empty()).then(|| take(1));
        let input = take(1);
        let list = take(u16::MAX);
        Self { pills, input, list }
    }

    /// Index of the first visible item, keeping the highlight in view
    pub fn list_offset(&self, view: &View) -> usize {
        let height = usize::from(self.list.height.max(1));
        view.items
            .iter()
            .position(|item| item.highlighted)
            .map_or(0, |h| (h + 1).saturating_sub(height))
    }

    /// Item under a screen row of the list
    pub fn item_at<'v>(&self, view: &'v View, row: u16) -> Option<&'v RenderedItem> {
        if view.loading.is_some() || !view.open || row < self.list.y || row >= self.list.bottom() {
            return None;
        }
        view.items
            .get(self.list_offset(view) + usize::from(row - self.list.y))
    }

    /// Areas of the pill remove affordances, with the value they remove
    pub fn remove_targets(&self, view: &View) -> Vec<(Rect, String)> {
        let Some(row) = self.pills else {
            return Vec::new();
        };
        let mut x = row.x;
        let mut targets = Vec::new();
        for pill in &view.pills {
            x = x.saturating_add(width_u16(&pill_label(&pill.content)));
            if x < row.right() {
                targets.push((Rect::new(x, row.y, width_u16(REMOVE_MARK), 1), pill.value.clone()));
            }
            x = x.saturating_add(width_u16(REMOVE_MARK) + 2);
        }
        targets
    }

    /// Terminal cursor position at the end of the search text
    pub fn cursor_position(&self, view: &View) -> Position {
        let x = self
            .input
            .x
            .saturating_add(width_u16(PROMPT))
            .saturating_add(width_u16(&view.search_text));
        Position::new(x.min(self.input.right().saturating_sub(1)), self.input.y)
    }
}

fn pill_label(content: &RenderedNode) -> String {
    format!(" {} ", content.text_content())
}

/// Flattens a rendered node into styled spans
pub fn node_spans(node: &RenderedNode, theme: &ColorTheme, base: Style) -> Vec<Span<'static>> {
    match node {
        RenderedNode::Text(text) => vec![Span::styled(text.clone(), base)],
        RenderedNode::Image { src } => vec![Span::styled(format!("<{src}>"), base.patch(theme.placeholder))],
        RenderedNode::Link { children, .. } => children
            .iter()
            .flat_map(|c| node_spans(c, theme, base.patch(theme.link)))
            .collect(),
        RenderedNode::Checkbox { checked } => {
            let mark = if *checked { "[x] " } else { "[ ] " };
            vec![Span::styled(mark, base.patch(theme.checkbox))]
        }
        RenderedNode::Group(children) => children.iter().flat_map(|c| node_spans(c, theme, base)).collect(),
    }
}

/// Draws a control
pub struct SelectWidget<'a> {
    view: &'a View,
    theme: &'a ColorTheme,
}

impl<'a> SelectWidget<'a> {
    /// Creates a widget for `view`
    pub fn new(view: &'a View, theme: &'a ColorTheme) -> Self {
        Self { view, theme }
    }

    fn pills_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for pill in &self.view.pills {
            spans.push(Span::styled(pill_label(&pill.content), self.theme.pill));
            spans.push(Span::styled(REMOVE_MARK, self.theme.remove));
            spans.push(Span::styled(" ", self.theme.pill));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }

    fn input_line(&self) -> Line<'static> {
        let text = if self.view.search_text.is_empty() {
            Span::styled(self.view.placeholder.clone(), self.theme.placeholder)
        } else {
            Span::styled(self.view.search_text.clone(), self.theme.query)
        };
        Line::from(vec![Span::styled(PROMPT, self.theme.prompt), text])
    }

    fn item_line(&self, item: &RenderedItem) -> Line<'static> {
        let mut base = self.theme.normal;
        if item.selected {
            base = base.patch(self.theme.selected);
        }
        let cursor = if item.highlighted {
            base = base.patch(self.theme.highlighted);
            Span::styled(CURSOR, self.theme.cursor)
        } else {
            Span::styled(" ", base)
        };
        let mut spans = vec![cursor, Span::styled(" ", base)];
        spans.extend(node_spans(&item.content, self.theme, base));
        Line::from(spans).style(base)
    }
}

impl Widget for SelectWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = ControlLayout::compute(area, self.view);
        if let Some(pills) = layout.pills {
            Paragraph::new(self.pills_line()).render(pills, buf);
        }
        Paragraph::new(self.input_line())
            .style(self.theme.normal)
            .render(layout.input, buf);

        if !self.view.open || layout.list.height == 0 {
            return;
        }
        let lines: Vec<Line> = match &self.view.loading {
            Some(text) => vec![Line::from(vec![Span::raw("  "), Span::styled(text.clone(), self.theme.loading)])],
            None => self
                .view
                .items
                .iter()
                .skip(layout.list_offset(self.view))
                .take(usize::from(layout.list.height))
                .map(|item| self.item_line(item))
                .collect(),
        };
        Paragraph::new(lines).render(layout.list, buf);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::render::RenderedPill;

    fn view(items: usize, highlight: Option<usize>) -> View {
        View {
            name: "v".into(),
            submission: String::new(),
            search_text: "ab".into(),
            placeholder: "Type to search...".into(),
            open: true,
            loading: None,
            items: (0..items)
                .map(|i| RenderedItem {
                    value: i.to_string(),
                    content: RenderedNode::Text(format!("item {i}")),
                    selected: false,
                    highlighted: highlight == Some(i),
                })
                .collect(),
            pills: vec![
                RenderedPill {
                    value: "a".into(),
                    content: RenderedNode::Text("Ada".into()),
                },
                RenderedPill {
                    value: "b".into(),
                    content: RenderedNode::Text("Bob".into()),
                },
            ],
        }
    }

    #[test]
    fn layout_rows() {
        let v = view(3, Some(0));
        let layout = ControlLayout::compute(Rect::new(0, 0, 20, 4), &v);
        assert_eq!(layout.pills, Some(Rect::new(0, 0, 20, 1)));
        assert_eq!(layout.input, Rect::new(0, 1, 20, 1));
        assert_eq!(layout.list, Rect::new(0, 2, 20, 2));
        assert_eq!(layout.cursor_position(&v), Position::new(4, 1));
    }

    #[test]
    fn list_scrolls_to_highlight() {
        let v = view(10, Some(5));
        let layout = ControlLayout::compute(Rect::new(0, 0, 20, 5), &v);
        // three list rows: items 3, 4 and 5 are visible
        assert_eq!(layout.list_offset(&v), 3);
        assert_eq!(layout.item_at(&v, 2).map(|i| i.value.as_str()), Some("3"));
        assert_eq!(layout.item_at(&v, 4).map(|i| i.value.as_str()), Some("5"));
        assert!(layout.item_at(&v, 5).is_none());
    }

    #[test]
    fn remove_targets_follow_pill_widths() {
        let v = view(0, None);
        let layout = ControlLayout::compute(Rect::new(0, 0, 40, 3), &v);
        let targets = layout.remove_targets(&v);
        // " Ada " is 5 wide, then "×", " " and a gap
        assert_eq!(targets, vec![(Rect::new(5, 0, 1, 1), "a".to_string()), (Rect::new(13, 0, 1, 1), "b".to_string())]);
    }

    #[test]
    fn renders_rows() {
        let mut v = view(2, Some(1));
        v.pills.clear();
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        SelectWidget::new(&v, &ColorTheme::default()).render(area, &mut buf);
        let rows: Vec<String> = (0..3u16)
            .map(|y| {
                (0..12u16)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect();
        assert_eq!(rows, ["> ab", "  item 0", "> item 1"]);
    }
}
