use std::ops::{Deref, DerefMut};
use std::sync::Once;

use color_eyre::eyre::Result;
use crossterm::event::KeyEventKind;
use crossterm::event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{self, cursor};
use futures::{FutureExt as _, StreamExt as _};
use ratatui::prelude::Backend;
use ratatui::{TerminalOptions, Viewport};
use tokio::sync::mpsc::unbounded_channel;
use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use super::{Event, Size};

const TICK_RATE: f64 = 4.;
const FRAME_RATE: f64 = 1.;
static PANIC_HOOK_SET: Once = Once::new();

/// Terminal handler of the control
pub struct Tui<B: Backend = ratatui::backend::CrosstermBackend<std::io::BufWriter<std::io::Stderr>>> {
    /// The ratatui terminal instance
    pub terminal: ratatui::Terminal<B>,
    /// Background task handle for event polling
    pub task: Option<JoinHandle<()>>,
    /// Receiver for TUI events
    pub event_rx: UnboundedReceiver<Event>,
    /// Sender for TUI events
    pub event_tx: UnboundedSender<Event>,
    /// Frame rate for rendering (frames per second)
    pub frame_rate: f64,
    /// Tick rate for updates (ticks per second)
    pub tick_rate: f64,
    /// Token for cancelling background tasks
    pub cancellation_token: CancellationToken,
    /// Whether running in fullscreen mode
    pub is_fullscreen: bool,
}

impl<B: Backend> Tui<B> {
    /// Creates a new TUI with the specified backend and height
    ///
    /// Anything below the full terminal height is drawn inline, below the
    /// current cursor line.
    pub fn new_with_height(backend: B, height: Size) -> Result<Self>
    where
        B::Error: Send + Sync + 'static,
    {
        let (event_tx, event_rx) = unbounded_channel();
        let term_height = backend.size()?.height;
        let lines = height.lines(term_height);
        let viewport = match lines {
            Some(lines) => Viewport::Inline(lines.max(2)),
            None => Viewport::Fullscreen,
        };

        set_panic_hook();
        Ok(Self {
            terminal: ratatui::Terminal::with_options(backend, TerminalOptions { viewport })?,
            task: None,
            event_rx,
            event_tx,
            frame_rate: FRAME_RATE,
            tick_rate: TICK_RATE,
            cancellation_token: CancellationToken::default(),
            is_fullscreen: lines.is_none(),
        })
    }

    /// Enters the TUI by enabling raw mode and starting event handling
    pub fn enter(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(std::io::stderr(), EnableMouseCapture, EnableBracketedPaste)?;
        if self.is_fullscreen {
            crossterm::execute!(std::io::stderr(), EnterAlternateScreen)?;
        }
        self.start();
        Ok(())
    }

    /// Exits the TUI by stopping event handling and disabling raw mode
    pub fn exit(&mut self) -> Result<()>
    where
        B::Error: Send + Sync + 'static,
    {
        self.stop();
        if crossterm::terminal::is_raw_mode_enabled()? {
            self.terminal.flush()?;
            crossterm::execute!(
                std::io::stderr(),
                DisableMouseCapture,
                DisableBracketedPaste,
                LeaveAlternateScreen,
                cursor::Show
            )?;
            crossterm::terminal::disable_raw_mode()?;
        }
        // inline: wipe the drawing area and leave the cursor at its top
        if !self.is_fullscreen {
            let area = self.terminal.get_frame().area();
            self.terminal.clear()?;
            self.terminal.set_cursor_position(area.as_position())?;
        }
        Ok(())
    }

    /// Stops the TUI event loop
    pub fn stop(&self) {
        self.cancellation_token.cancel();
    }

    /// Starts the event loop for handling terminal and timer events
    pub fn start(&mut self) {
        let tick_delay = std::time::Duration::from_secs_f64(1.0 / self.tick_rate);
        let render_delay = std::time::Duration::from_secs_f64(1.0 / self.frame_rate);
        let event_tx = self.event_tx.clone();
        if let Some(task) = self.task.take() {
            self.cancellation_token.cancel();
            task.abort();
            self.cancellation_token = CancellationToken::new();
        }
        let token = self.cancellation_token.clone();
        self.task = Some(tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_delay);
            let mut render_interval = tokio::time::interval(render_delay);
            loop {
                let tick_delay = tick_interval.tick();
                let render_delay = render_interval.tick();
                let crossterm_event = reader.next().fuse();
                tokio::select! {
                    _ = token.cancelled() => {
                        break;
                    }
                    maybe_event = crossterm_event => {
                        match maybe_event {
                            Some(Ok(crossterm::event::Event::Key(key))) => {
                                if key.kind == KeyEventKind::Press {
                                    _ = event_tx.send(Event::Key(key));
                                }
                            }
                            Some(Ok(crossterm::event::Event::Mouse(mouse))) => {
                                _ = event_tx.send(Event::Mouse(mouse));
                            }
                            Some(Ok(crossterm::event::Event::Paste(text))) => {
                                _ = event_tx.send(Event::Paste(text));
                            }
                            Some(Ok(crossterm::event::Event::Resize(..))) => {
                                _ = event_tx.send(Event::Resize);
                            }
                            Some(Err(e)) => {
                                _ = event_tx.send(Event::Error(e.to_string()));
                            }
                            None => break,
                            Some(Ok(_)) => {}
                        }
                    },
                    _ = tick_delay => {
                        _ = event_tx.send(Event::Heartbeat);
                    },
                    _ = render_delay => {
                        _ = event_tx.send(Event::Render);
                    },
                }
            }
        }));
    }

    /// Gets the next event from the event queue
    pub async fn next(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }
}

impl<B: Backend> Deref for Tui<B> {
    type Target = ratatui::Terminal<B>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl<B: Backend> DerefMut for Tui<B> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl<B: Backend> Drop for Tui<B> {
    fn drop(&mut self) {
        if let Some(t) = self.task.take() {
            t.abort();
        }
        self.stop();
        if let Ok(true) = crossterm::terminal::is_raw_mode_enabled() {
            _ = crossterm::execute!(
                std::io::stderr(),
                DisableMouseCapture,
                DisableBracketedPaste,
                LeaveAlternateScreen,
                cursor::Show
            );
            _ = crossterm::terminal::disable_raw_mode();
        }
    }
}

fn set_panic_hook() {
    PANIC_HOOK_SET.call_once(|| {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            ratatui::restore(); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    });
}
