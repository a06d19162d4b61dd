//! Module containing the interactive entry point
use std::io::{BufWriter, Stderr};
use std::sync::Arc;

use color_eyre::eyre::{self, OptionExt, Result};
use ratatui::prelude::CrosstermBackend;
use tokio::{runtime::Handle, select, task::block_in_place};

use crate::controller::{Controller, Input};
use crate::options::SelectOptions;
use crate::output::SelectOutput;
use crate::query::{QueryEngine, Transport};
use crate::runtime::Session;
use crate::source::SelectSource;
use crate::theme::{ColorTheme, register_theme};
use crate::tui::{App, Size, Tui};

/// Runs one select control in the terminal
pub struct BetterSelect<Backend = CrosstermBackend<BufWriter<Stderr>>>
where
    Backend: ratatui::backend::Backend,
    Backend::Error: Send + Sync + 'static,
{
    app: App,
    tui: Option<Tui<Backend>>,
    height: Size,
}

impl BetterSelect {
    /// Runs a control described by `source` and configured by `options`,
    /// blocking until the user accepts or aborts
    pub fn run_with(options: SelectOptions, source: SelectSource) -> Result<SelectOutput> {
        trace!("running betterselect");
        let task = async {
            let mut select = Self::init(options, source)?;
            select.init_tui()?;
            select.enter()?;
            select.run().await?;
            eyre::Ok(select.output())
        };
        let output = if let Ok(handle) = Handle::try_current() {
            block_in_place(|| handle.block_on(task))?
        } else {
            tokio::runtime::Runtime::new()?.block_on(task)?
        };
        debug!("output: {output:?}");
        Ok(output)
    }

    /// Initialize the TUI on stderr, but do not enter it yet
    pub fn init_tui(&mut self) -> Result<()> {
        let backend = CrosstermBackend::new(BufWriter::new(std::io::stderr()));
        self.tui = Some(Tui::new_with_height(backend, self.height)?);
        Ok(())
    }
}

impl<Backend: ratatui::backend::Backend + 'static> BetterSelect<Backend>
where
    Backend::Error: Send + Sync + 'static,
{
    /// Initialize the control, querying remote sources over HTTP
    pub fn init(options: SelectOptions, source: SelectSource) -> Result<Self> {
        let transport = if options.url.is_some() || source.url.is_some() {
            Some(default_transport()?)
        } else {
            None
        };
        Self::init_with_transport(options, source, transport)
    }

    /// Initialize the control with a caller-provided transport for remote queries
    pub fn init_with_transport(
        options: SelectOptions,
        source: SelectSource,
        transport: Option<Arc<dyn Transport>>,
    ) -> Result<Self> {
        let options = options.merge_source(&source);
        let height = Size::try_from(options.height.as_str())?;
        let theme = ColorTheme::init_from_options(&options);
        register_theme(theme);

        let engine = match (options.remote(), transport) {
            (Some(config), Some(transport)) => Some(QueryEngine::new(config, transport)),
            (Some(config), None) => eyre::bail!("no transport to query {}", config.url_template),
            (None, _) => None,
        };
        let mut controller = Controller::new(options.controller_config(), source.select_options())
            .with_renderer(source.renderer());
        if let Some(query) = &options.query {
            controller = controller.with_search(query.as_str());
        }
        Ok(Self {
            app: App::new(Session::new(controller, engine), theme),
            tui: None,
            height,
        })
    }

    /// Initialize the TUI with a caller-provided instance.
    pub fn init_tui_with(&mut self, tui: Tui<Backend>) {
        self.tui = Some(tui);
    }

    /// Returns a shared reference to the application state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Returns a mutable reference to the application state.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Returns mutable references to both the app and the TUI, for hosts
    /// driving the loop themselves.
    pub fn app_and_tui(&mut self) -> Result<(&mut App, &mut Tui<Backend>)> {
        let tui = self.tui.as_mut().ok_or_eyre("TUI needs to be initialized before access")?;
        Ok((&mut self.app, tui))
    }

    /// Enter the TUI and focus the control
    pub fn enter(&mut self) -> Result<()> {
        debug!("Entering TUI");
        self.tui
            .as_mut()
            .ok_or_eyre("TUI needs to be initialized before entering")?
            .enter()?;
        self.app.session.dispatch(Input::Focus);
        Ok(())
    }

    /// Process a single event loop iteration: one terminal event, or one
    /// timer/fetch completion of the control.
    ///
    /// Returns `Ok(true)` once the user accepted or aborted.
    pub async fn tick(&mut self) -> Result<bool> {
        let Self { app, tui, .. } = self;
        let tui = tui.as_mut().ok_or_eyre("TUI should be initialized before the event loop can start")?;
        let redraw = select! {
            event = tui.next() => {
                let event = event.ok_or_eyre("Could not acquire next event")?;
                app.handle_event(&event)
            }
            Some(input) = app.session.recv() => {
                app.session.dispatch(input);
                true
            }
        };
        if redraw && !app.should_quit {
            tui.draw(|frame| app.render(frame))?;
        }
        Ok(app.should_quit)
    }

    /// Run the event loop on the current task until the user accepts or aborts.
    pub async fn run(&mut self) -> Result<()> {
        trace!("Starting event loop");
        if let Some(tui) = self.tui.as_mut() {
            let app = &mut self.app;
            tui.draw(|frame| app.render(frame))?;
        }
        while !self.tick().await? {}
        Ok(())
    }

    /// Capture `self` and extract the output
    pub fn output(mut self) -> SelectOutput {
        if let Some(mut tui) = self.tui.take()
            && let Err(e) = tui.exit()
        {
            warn!("failed to restore the terminal: {e}");
        }
        let controller = self.app.session.controller();
        SelectOutput {
            name: controller.name().to_string(),
            value: controller.submission_value(),
            values: controller.selection().values().map(String::from).collect(),
            query: controller.search_text().to_string(),
            is_abort: self.app.aborted,
        }
    }
}

#[cfg(feature = "http")]
fn default_transport() -> Result<Arc<dyn Transport>> {
    Ok(Arc::new(crate::transport::HttpTransport::new()?))
}

#[cfg(not(feature = "http"))]
fn default_transport() -> Result<Arc<dyn Transport>> {
    eyre::bail!("remote lookups need the `http` feature")
}
