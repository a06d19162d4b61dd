//! The selection/filtering/navigation state machine.
//!
//! [`Controller::dispatch`] is the single entry point: every pointer, key,
//! focus, timer and fetch-completion event goes through it as an [`Input`]
//! and comes back as a list of [`Effect`]s for the runtime to execute. The
//! controller itself never blocks, sleeps or performs I/O.
//!
//! Two counters keep asynchronous results in order. The debounce generation
//! is bumped on every keystroke and checked when a timer fires; the query
//! generation is bumped on every issued fetch and checked when it resolves.
//! Anything carrying an outdated generation is dropped.

use std::time::Duration;

use crate::option::{Catalog, SelectOption, filter_local};
use crate::render::{DefaultRenderer, ItemContext, RenderedItem, RenderedPill, Renderer, View};
use crate::selection::{SelectMode, Selection, Toggled};

/// Quiet period before a remote query is issued
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Visibility of the option list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DropdownState {
    /// List hidden, keyboard navigation inert
    #[default]
    Closed,
    /// List shown with a resolved catalog
    OpenIdle,
    /// List shown while a remote query is pending
    OpenLoading,
}

/// Keys the control reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Move the highlight up
    Up,
    /// Move the highlight down
    Down,
    /// Toggle the highlighted option
    Enter,
    /// Close the list
    Escape,
    /// Insert a character in the search text
    Char(char),
    /// Delete the last character of the search text
    Backspace,
}

/// What a pointer press landed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The search input
    SearchInput,
    /// A catalog entry
    Option(String),
    /// The remove affordance of a pill
    RemovePill(String),
    /// Anything outside the control
    Outside,
}

/// Events fed to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// The search input gained focus
    Focus,
    /// A pointer press
    PointerDown(Target),
    /// The pointer entered the option list
    PointerEnterList,
    /// A key press
    Key(Key),
    /// The search text was replaced as a whole (paste, host update)
    SetText(String),
    /// Focus left the control
    FocusLost,
    /// A debounce timer fired
    TimerFired(u64),
    /// A remote query completed
    FetchResolved {
        /// Generation the fetch was issued with
        generation: u64,
        /// Normalized options, empty on failure
        options: Vec<SelectOption>,
    },
}

/// Notification sent to the host after every selection mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Name of the submission field
    pub name: String,
    /// Mirrored submission value
    pub value: String,
    /// Selected values in order
    pub values: Vec<String>,
}

/// Side effects requested by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// (Re)start the debounce timer; it must report back with [`Input::TimerFired`]
    ScheduleQuery {
        /// Generation to report
        generation: u64,
        /// Delay before firing
        delay: Duration,
    },
    /// Cancel the pending debounce timer
    CancelQuery,
    /// Run a remote query and report back with [`Input::FetchResolved`]
    Fetch {
        /// Generation to report
        generation: u64,
        /// Search text
        query: String,
    },
    /// The selection changed
    Changed(ChangeEvent),
}

/// Static configuration of a controller
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Name of the submission field
    pub name: String,
    /// Single or multi-value
    pub mode: SelectMode,
    /// Whether options come from remote queries
    pub remote: bool,
    /// Quiet period before a remote query is issued
    pub debounce: Duration,
    /// Placeholder of the empty search input
    pub placeholder: String,
    /// Text shown while a remote query is pending
    pub loading_text: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            mode: SelectMode::Single,
            remote: false,
            debounce: DEFAULT_DEBOUNCE,
            placeholder: String::from("Type to search..."),
            loading_text: String::from("Loading..."),
        }
    }
}

/// State of one select control
#[derive(derive_more::Debug)]
pub struct Controller {
    config: ControllerConfig,
    /// Declared options, kept in sync with the selection
    source: Vec<SelectOption>,
    catalog: Catalog,
    selection: Selection,
    highlight: Option<usize>,
    keyboard_nav: bool,
    state: DropdownState,
    search: String,
    timer_generation: u64,
    query_generation: u64,
    #[debug(skip)]
    renderer: Box<dyn Renderer>,
}

impl Controller {
    /// Creates a controller over the declared `options`, seeding the
    /// selection from the ones marked selected
    pub fn new(config: ControllerConfig, options: Vec<SelectOption>) -> Self {
        let selection = Selection::seeded(config.mode, &options);
        let catalog = if config.remote {
            Catalog::empty()
        } else {
            filter_local(&options, "")
        };
        Self {
            config,
            source: options,
            catalog,
            selection,
            highlight: None,
            keyboard_nav: false,
            state: DropdownState::Closed,
            search: String::new(),
            timer_generation: 0,
            query_generation: 0,
            renderer: Box::new(DefaultRenderer),
        }
    }

    /// Replaces the renderer
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Sets the initial search text without opening the list
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        if !self.config.remote {
            self.catalog = filter_local(&self.source, &self.search);
        }
        self
    }

    /// Current dropdown state
    pub fn state(&self) -> DropdownState {
        self.state
    }

    /// Whether the list is open
    pub fn is_open(&self) -> bool {
        self.state != DropdownState::Closed
    }

    /// Whether a remote query is pending
    pub fn is_loading(&self) -> bool {
        self.state == DropdownState::OpenLoading
    }

    /// The rendered catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Declared options, with `selected` flags mirroring the selection
    pub fn source_options(&self) -> &[SelectOption] {
        &self.source
    }

    /// The selection
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Index of the highlighted catalog entry
    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    /// Current search text
    pub fn search_text(&self) -> &str {
        &self.search
    }

    /// Name of the submission field
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Mirrored submission value
    pub fn submission_value(&self) -> String {
        self.selection.submission_value()
    }

    /// Feeds one event through the state machine
    pub fn dispatch(&mut self, input: Input) -> Vec<Effect> {
        trace!("dispatch {input:?} in {:?}", self.state);
        let mut effects = Vec::new();
        match input {
            Input::Focus | Input::PointerDown(Target::SearchInput) => self.open(&mut effects),
            Input::PointerDown(Target::Option(value)) => self.toggle(&value, &mut effects),
            Input::PointerDown(Target::RemovePill(value)) => self.remove(&value, &mut effects),
            Input::PointerDown(Target::Outside) | Input::FocusLost => self.close(&mut effects),
            Input::PointerEnterList => {
                if self.keyboard_nav {
                    self.keyboard_nav = false;
                    self.highlight = None;
                }
            }
            Input::Key(key) => self.on_key(key, &mut effects),
            Input::SetText(text) => {
                if text != self.search {
                    self.search = text;
                    self.on_search_changed(&mut effects);
                }
            }
            Input::TimerFired(generation) => self.on_timer(generation, &mut effects),
            Input::FetchResolved { generation, options } => self.on_fetch_resolved(generation, options),
        }
        effects
    }

    /// Assembles everything a host needs to draw the control
    pub fn view(&self) -> View {
        let items = if self.is_loading() {
            Vec::new()
        } else {
            self.catalog
                .iter()
                .enumerate()
                .map(|(i, option)| {
                    let selected = self.selection.contains(&option.value);
                    let ctx = ItemContext {
                        mode: self.config.mode,
                        selected,
                    };
                    RenderedItem {
                        value: option.value.clone(),
                        content: self.renderer.render_item(option, ctx),
                        selected,
                        highlighted: self.highlight == Some(i),
                    }
                })
                .collect()
        };
        let pills = match self.config.mode {
            SelectMode::Single => Vec::new(),
            SelectMode::Multi => self
                .selection
                .options()
                .map(|option| RenderedPill {
                    value: option.value.clone(),
                    content: self.renderer.render_pill(option),
                })
                .collect(),
        };
        View {
            name: self.config.name.clone(),
            submission: self.submission_value(),
            search_text: self.search.clone(),
            placeholder: self.config.placeholder.clone(),
            open: self.is_open(),
            loading: self.is_loading().then(|| self.config.loading_text.clone()),
            items,
            pills,
        }
    }

    fn on_key(&mut self, key: Key, effects: &mut Vec<Effect>) {
        match key {
            Key::Down | Key::Up => {
                if !self.is_open() {
                    self.open(effects);
                }
                self.move_highlight(key == Key::Down);
            }
            Key::Enter => {
                let highlighted = self
                    .highlight
                    .and_then(|i| self.catalog.get(i))
                    .map(|option| option.value.clone());
                if let Some(value) = highlighted {
                    self.toggle(&value, effects);
                }
            }
            Key::Escape => self.close(effects),
            Key::Char(c) => {
                self.search.push(c);
                self.on_search_changed(effects);
            }
            Key::Backspace => {
                if self.search.pop().is_some() {
                    self.on_search_changed(effects);
                }
            }
        }
    }

    fn move_highlight(&mut self, down: bool) {
        self.keyboard_nav = true;
        let Some(last) = self.catalog.len().checked_sub(1) else {
            self.highlight = None;
            return;
        };
        self.highlight = Some(match (self.highlight, down) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(last),
            (Some(i), false) => i.saturating_sub(1).min(last),
        });
    }

    fn open(&mut self, effects: &mut Vec<Effect>) {
        if self.is_open() {
            return;
        }
        debug!("opening {:?}", self.config.name);
        self.state = DropdownState::OpenIdle;
        self.resolve_now(effects);
    }

    fn close(&mut self, effects: &mut Vec<Effect>) {
        if self.is_open() {
            debug!("closing {:?}", self.config.name);
        }
        if self.config.remote {
            self.discard_pending(effects);
        }
        self.state = DropdownState::Closed;
        self.highlight = None;
        self.keyboard_nav = false;
    }

    /// Cancels the debounce timer and orphans any in-flight fetch
    fn discard_pending(&mut self, effects: &mut Vec<Effect>) {
        self.timer_generation += 1;
        self.query_generation += 1;
        effects.push(Effect::CancelQuery);
    }

    /// Replaces the catalog and recomputes the default highlight
    fn show(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.highlight = (self.is_open() && !self.catalog.is_empty()).then_some(0);
        if self.is_open() {
            self.state = DropdownState::OpenIdle;
        }
    }

    fn start_loading(&mut self) {
        self.catalog = Catalog::empty();
        self.highlight = None;
        if self.is_open() {
            self.state = DropdownState::OpenLoading;
        }
    }

    /// Resolves the catalog for the current search text without debouncing
    fn resolve_now(&mut self, effects: &mut Vec<Effect>) {
        if !self.config.remote {
            self.show(filter_local(&self.source, &self.search));
            return;
        }
        self.discard_pending(effects);
        if self.search.is_empty() {
            self.show(Catalog::empty());
        } else {
            self.start_loading();
            effects.push(Effect::Fetch {
                generation: self.query_generation,
                query: self.search.clone(),
            });
        }
    }

    fn on_search_changed(&mut self, effects: &mut Vec<Effect>) {
        if !self.is_open() {
            self.state = DropdownState::OpenIdle;
        }
        if !self.config.remote {
            self.show(filter_local(&self.source, &self.search));
            return;
        }
        if self.search.is_empty() {
            self.discard_pending(effects);
            self.show(Catalog::empty());
            return;
        }
        self.timer_generation += 1;
        self.start_loading();
        trace!("debouncing query {:?} (generation {})", self.search, self.timer_generation);
        effects.push(Effect::ScheduleQuery {
            generation: self.timer_generation,
            delay: self.config.debounce,
        });
    }

    fn on_timer(&mut self, generation: u64, effects: &mut Vec<Effect>) {
        if generation != self.timer_generation || !self.is_loading() {
            trace!("ignoring superseded timer {generation}");
            return;
        }
        self.query_generation += 1;
        debug!("querying {:?} (generation {})", self.search, self.query_generation);
        effects.push(Effect::Fetch {
            generation: self.query_generation,
            query: self.search.clone(),
        });
    }

    fn on_fetch_resolved(&mut self, generation: u64, options: Vec<SelectOption>) {
        if generation != self.query_generation {
            debug!("discarding stale result of generation {generation}");
            return;
        }
        debug!("applying {} options of generation {generation}", options.len());
        self.show(options.into());
    }

    /// Toggles an option of the rendered catalog
    fn toggle(&mut self, value: &str, effects: &mut Vec<Effect>) {
        if !self.is_open() {
            debug!("ignoring toggle of {value:?} while closed");
            return;
        }
        let Some(option) = self.catalog.find(value).cloned() else {
            debug!("{value:?} is not in the current catalog");
            return;
        };
        match self.selection.toggle(&option) {
            Toggled::Added => debug!("selected {value:?}"),
            Toggled::Removed => debug!("deselected {value:?}"),
        }
        match self.config.mode {
            SelectMode::Single => {
                self.search = option.text.clone();
                self.close(effects);
            }
            SelectMode::Multi => {
                self.search.clear();
                self.resolve_now(effects);
            }
        }
        self.after_mutation(effects);
    }

    /// Removes a selected value through its pill
    fn remove(&mut self, value: &str, effects: &mut Vec<Effect>) {
        if self.selection.remove(value).is_none() {
            debug!("{value:?} is not selected");
            return;
        }
        if self.config.mode == SelectMode::Multi {
            self.search.clear();
            self.resolve_now(effects);
        }
        self.after_mutation(effects);
    }

    fn after_mutation(&mut self, effects: &mut Vec<Effect>) {
        for option in &mut self.source {
            option.selected = self.selection.contains(&option.value);
        }
        let event = ChangeEvent {
            name: self.config.name.clone(),
            value: self.selection.submission_value(),
            values: self.selection.values().map(String::from).collect(),
        };
        debug!("{:?} changed to {:?}", event.name, event.value);
        effects.push(Effect::Changed(event));
    }
}
