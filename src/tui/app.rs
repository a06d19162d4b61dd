use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};

use crate::controller::{Input, Key, Target};
use crate::render::View;
use crate::runtime::Session;
use crate::theme::ColorTheme;

use super::Event;
use super::event::{KeyAction, key_action};
use super::widget::{ControlLayout, SelectWidget};

/// Application state of the terminal front-end
#[derive(Debug)]
pub struct App {
    /// The control
    pub session: Session,
    /// Colors
    pub theme: ColorTheme,
    /// Set once the user accepted or aborted
    pub should_quit: bool,
    /// Set when the user left without submitting
    pub aborted: bool,
    area: Rect,
    pointer_in_list: bool,
}

impl App {
    /// Creates the app around `session`
    pub fn new(session: Session, theme: ColorTheme) -> Self {
        Self {
            session,
            theme,
            should_quit: false,
            aborted: false,
            area: Rect::default(),
            pointer_in_list: false,
        }
    }

    /// Area of the last drawn frame
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Handles one terminal event, returning whether a redraw is needed
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Error(e) => {
                warn!("terminal error: {e}");
                return false;
            }
            Event::Heartbeat => return false,
            Event::Render | Event::Resize => {}
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Paste(text) => {
                // the search field is a single line
                let pasted = text.trim_end_matches(['\r', '\n']).replace("\r\n", " ").replace(['\r', '\n'], " ");
                let text = format!("{}{pasted}", self.session.controller().search_text());
                self.session.dispatch(Input::SetText(text));
            }
        }
        true
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        match key_action(key, self.session.controller().is_open()) {
            KeyAction::Control(input) => self.session.dispatch(input),
            KeyAction::Accept => {
                debug!("accepting {:?}", self.session.controller().submission_value());
                self.should_quit = true;
            }
            KeyAction::Abort => {
                debug!("aborting");
                self.should_quit = true;
                self.aborted = true;
            }
            KeyAction::Ignore => trace!("unbound key {key:?}"),
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        let pos = Position::new(mouse.column, mouse.row);
        let view = self.session.controller().view();
        let layout = ControlLayout::compute(self.area, &view);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(target) = self.target_at(&layout, &view, pos) {
                    self.session.dispatch(Input::PointerDown(target));
                }
            }
            MouseEventKind::Moved => {
                let in_list = view.open && layout.list.contains(pos);
                if in_list && !self.pointer_in_list {
                    self.session.dispatch(Input::PointerEnterList);
                }
                self.pointer_in_list = in_list;
            }
            MouseEventKind::ScrollUp if view.open => self.session.dispatch(Input::Key(Key::Up)),
            MouseEventKind::ScrollDown if view.open => self.session.dispatch(Input::Key(Key::Down)),
            _ => {}
        }
    }

    fn target_at(&self, layout: &ControlLayout, view: &View, pos: Position) -> Option<Target> {
        if !self.area.contains(pos) {
            return Some(Target::Outside);
        }
        if let Some((_, value)) = layout
            .remove_targets(view)
            .into_iter()
            .find(|(rect, _)| rect.contains(pos))
        {
            return Some(Target::RemovePill(value));
        }
        if layout.input.contains(pos) {
            return Some(Target::SearchInput);
        }
        layout
            .item_at(view, pos.y)
            .map(|item| Target::Option(item.value.clone()))
    }

    /// Draws the control on the whole frame
    pub fn render(&mut self, frame: &mut Frame) {
        self.area = frame.area();
        let view = self.session.controller().view();
        let layout = ControlLayout::compute(self.area, &view);
        frame.render_widget(SelectWidget::new(&view, &self.theme), self.area);
        frame.set_cursor_position(layout.cursor_position(&view));
    }
}
