use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use betterselect::prelude::*;
use betterselect::tui::{App, Size};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::backend::TestBackend;
use serde_json::json;

pub const URL: &str = "https://lookup.test/users?q={query}";

/// Drives a [`BetterSelect<TestBackend>`] without a real terminal.
///
/// Events go straight to the app, timer and fetch completions are drained
/// from the session after every step, and the screen is redrawn so that
/// [`TestHarness::screen`] always reflects the latest state.
pub struct TestHarness {
    pub select: BetterSelect<TestBackend>,
}

impl TestHarness {
    pub fn app(&mut self) -> &mut App {
        self.select.app_mut()
    }

    pub fn controller(&self) -> &Controller {
        self.select.app().session.controller()
    }

    /// Send an event and process what it triggers synchronously
    pub fn send(&mut self, event: Event) -> Result<()> {
        let app = self.app();
        app.handle_event(&event);
        app.session.drain();
        self.render()
    }

    pub fn key(&mut self, code: KeyCode) -> Result<()> {
        self.send(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    pub fn ctrl(&mut self, c: char) -> Result<()> {
        self.send(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)))
    }

    pub fn type_str(&mut self, s: &str) -> Result<()> {
        for c in s.chars() {
            self.key(KeyCode::Char(c))?;
        }
        Ok(())
    }

    pub fn click(&mut self, column: u16, row: u16) -> Result<()> {
        self.send(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }))
    }

    /// Let paused time run for `ms`, then process everything that completed
    pub async fn wait(&mut self, ms: u64) -> Result<()> {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        self.settle().await
    }

    /// Process completions until the session is quiet
    pub async fn settle(&mut self) -> Result<()> {
        loop {
            for _ in 0..3 {
                tokio::task::yield_now().await;
            }
            if self.app().session.drain() == 0 {
                break;
            }
        }
        self.render()
    }

    pub fn render(&mut self) -> Result<()> {
        let (app, tui) = self.select.app_and_tui()?;
        tui.draw(|frame| app.render(frame))?;
        Ok(())
    }

    /// Rows of the screen with trailing blanks removed
    pub fn screen(&mut self) -> Result<String> {
        self.render()?;
        let (_, tui) = self.select.app_and_tui()?;
        let buffer = tui.backend().buffer();
        let width = usize::from(buffer.area.width);
        let mut rows: Vec<String> = buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>().trim_end().to_string())
            .collect();
        while rows.last().is_some_and(String::is_empty) {
            rows.pop();
        }
        Ok(rows.join("\n"))
    }

    pub fn catalog(&self) -> Vec<String> {
        self.controller().catalog().iter().map(|o| o.value.clone()).collect()
    }
}

// ============================================================================
// Factory functions
// ============================================================================

/// Initialize a harness around `source`, focused, on a 30x8 screen.
pub fn enter_source(
    source: SelectSource,
    options: SelectOptions,
    transport: Option<Arc<dyn Transport>>,
) -> Result<TestHarness> {
    let tui = Tui::new_with_height(TestBackend::new(30, 8), Size::Percent(100))?;
    let mut select = BetterSelect::<TestBackend>::init_with_transport(options, source, transport)?;
    select.init_tui_with(tui);
    select.app_mut().session.dispatch(Input::Focus);
    let mut harness = TestHarness { select };
    harness.render()?;
    Ok(harness)
}

/// Initialize a harness over `value<TAB>text` lines
pub fn enter_lines(lines: &[&str], options: SelectOptions) -> Result<TestHarness> {
    let source = SelectSource::from_lines(&options.name, Cursor::new(lines.join("\n")))?;
    enter_source(source, options, None)
}

/// Initialize a remote harness answering from `transport`
pub fn enter_remote(transport: &MockTransport, multi: bool) -> Result<TestHarness> {
    let options = SelectOptionsBuilder::default()
        .name(String::from("user"))
        .multi(multi)
        .url(Some(URL.to_string()))
        .items_path(Some(String::from("data.users")))
        .build()?;
    enter_source(SelectSource::default(), options, Some(Arc::new(transport.clone())))
}

pub fn options(multi: bool) -> SelectOptions {
    SelectOptions {
        multi,
        name: String::from("letter"),
        ..Default::default()
    }
}

// ============================================================================
// Transport
// ============================================================================

/// In-memory lookup endpoint recording every query it receives.
///
/// Each query `q` answers two users, `q-1` and `q-2`, after the configured
/// delay. The query `fail` answers with a server error.
#[derive(Clone, Default)]
pub struct MockTransport {
    calls: Arc<Mutex<Vec<String>>>,
    delays: HashMap<String, u64>,
}

impl MockTransport {
    pub fn with_delay(mut self, query: &str, ms: u64) -> Self {
        self.delays.insert(query.to_string(), ms);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str) -> FetchFuture {
        let query = url.rsplit_once("q=").map(|(_, q)| q.to_string()).unwrap_or_default();
        self.calls.lock().unwrap().push(query.clone());
        let delay = self.delays.get(&query).copied().unwrap_or(0);
        Box::pin(async move {
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            if query == "fail" {
                return Err(QueryError::Status(500));
            }
            Ok(json!({
                "data": {
                    "users": [
                        { "id": format!("{query}-1"), "name": format!("{query} one") },
                        { "id": format!("{query}-2"), "name": format!("{query} two") },
                    ]
                }
            }))
        })
    }
}
