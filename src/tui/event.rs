use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};

use crate::controller::{Input, Key};

/// Events of the terminal front-end
#[derive(Clone, Debug)]
pub enum Event {
    /// An error occurred while reading the terminal
    Error(String),
    /// Heartbeat event
    Heartbeat,
    /// Render the UI
    Render,
    /// The terminal was resized
    Resize,
    /// A key was pressed
    Key(KeyEvent),
    /// A mouse event occurred
    Mouse(MouseEvent),
    /// Text was pasted (bracketed paste)
    Paste(String),
}

/// What the application does with a key press
#[derive(Clone, Debug, PartialEq)]
pub enum KeyAction {
    /// Feed the controller
    Control(Input),
    /// Submit the current selection
    Accept,
    /// Leave without submitting
    Abort,
    /// Nothing bound
    Ignore,
}

/// Maps a key press to what it does; `open` tells whether the list is shown
pub fn key_action(key: &KeyEvent, open: bool) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('g') if ctrl => KeyAction::Abort,
        KeyCode::Char('d') if ctrl => KeyAction::Accept,
        KeyCode::Char('p') if ctrl => KeyAction::Control(Input::Key(Key::Up)),
        KeyCode::Char('n') if ctrl => KeyAction::Control(Input::Key(Key::Down)),
        KeyCode::Char(_) if ctrl => KeyAction::Ignore,
        KeyCode::Char(c) => KeyAction::Control(Input::Key(Key::Char(c))),
        KeyCode::Backspace => KeyAction::Control(Input::Key(Key::Backspace)),
        KeyCode::Up | KeyCode::BackTab => KeyAction::Control(Input::Key(Key::Up)),
        KeyCode::Down | KeyCode::Tab => KeyAction::Control(Input::Key(Key::Down)),
        KeyCode::Enter if open => KeyAction::Control(Input::Key(Key::Enter)),
        KeyCode::Enter => KeyAction::Accept,
        KeyCode::Esc if open => KeyAction::Control(Input::Key(Key::Escape)),
        KeyCode::Esc => KeyAction::Accept,
        _ => KeyAction::Ignore,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn escape_closes_then_accepts() {
        assert_eq!(
            key_action(&key(KeyCode::Esc), true),
            KeyAction::Control(Input::Key(Key::Escape))
        );
        assert_eq!(key_action(&key(KeyCode::Esc), false), KeyAction::Accept);
    }

    #[test]
    fn control_keys() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_action(&ctrl_c, true), KeyAction::Abort);
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(key_action(&ctrl_d, true), KeyAction::Accept);
        assert_eq!(
            key_action(&key(KeyCode::Char('c')), true),
            KeyAction::Control(Input::Key(Key::Char('c')))
        );
    }

    #[test]
    fn enter_on_closed_list_accepts() {
        assert_eq!(key_action(&key(KeyCode::Enter), false), KeyAction::Accept);
        assert_eq!(
            key_action(&key(KeyCode::Enter), true),
            KeyAction::Control(Input::Key(Key::Enter))
        );
    }
}
