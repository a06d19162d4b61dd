//! Executes controller effects on tokio.
//!
//! The [`Driver`] turns [`Effect`]s into debounce timers and fetch tasks,
//! whose completions come back as [`Input`]s over a channel. A [`Session`]
//! bundles a controller with its driver and that channel, which is all a host
//! needs to run a control.

use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::controller::{ChangeEvent, Controller, Effect, Input};
use crate::debounce::Debouncer;
use crate::query::QueryEngine;

/// Runs the side effects requested by a controller
#[derive(Debug)]
pub struct Driver {
    engine: Option<Arc<QueryEngine>>,
    debouncer: Debouncer,
    input_tx: UnboundedSender<Input>,
    change_tx: Option<UnboundedSender<ChangeEvent>>,
}

impl Driver {
    /// Creates a driver reporting completions on `input_tx`
    pub fn new(engine: Option<QueryEngine>, input_tx: UnboundedSender<Input>) -> Self {
        Self {
            engine: engine.map(Arc::new),
            debouncer: Debouncer::new(),
            input_tx,
            change_tx: None,
        }
    }

    /// Forwards change notifications to `tx`
    pub fn notify(&mut self, tx: UnboundedSender<ChangeEvent>) {
        self.change_tx = Some(tx);
    }

    /// Executes effects in order
    pub fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ScheduleQuery { generation, delay } => {
                    let tx = self.input_tx.clone();
                    self.debouncer.schedule(delay, move || {
                        _ = tx.send(Input::TimerFired(generation));
                    });
                }
                Effect::CancelQuery => self.debouncer.cancel(),
                Effect::Fetch { generation, query } => self.fetch(generation, query),
                Effect::Changed(event) => {
                    if let Some(tx) = &self.change_tx
                        && tx.send(event).is_err()
                    {
                        trace!("change listener is gone");
                    }
                }
            }
        }
    }

    fn fetch(&self, generation: u64, query: String) {
        let tx = self.input_tx.clone();
        let Some(engine) = self.engine.clone() else {
            warn!("remote query {query:?} requested without a lookup URL");
            _ = tx.send(Input::FetchResolved {
                generation,
                options: Vec::new(),
            });
            return;
        };
        tokio::spawn(async move {
            let options = engine.query(&query).await;
            _ = tx.send(Input::FetchResolved { generation, options });
        });
    }
}

/// A controller wired to its driver
#[derive(Debug)]
pub struct Session {
    controller: Controller,
    driver: Driver,
    input_rx: UnboundedReceiver<Input>,
}

impl Session {
    /// Wires `controller` up; `engine` is required for remote controls
    pub fn new(controller: Controller, engine: Option<QueryEngine>) -> Self {
        let (input_tx, input_rx) = unbounded_channel();
        Self {
            controller,
            driver: Driver::new(engine, input_tx),
            input_rx,
        }
    }

    /// Returns a receiver of change notifications, replacing any previous one
    pub fn subscribe(&mut self) -> UnboundedReceiver<ChangeEvent> {
        let (tx, rx) = unbounded_channel();
        self.driver.notify(tx);
        rx
    }

    /// The controller
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Feeds an input and executes the resulting effects
    pub fn dispatch(&mut self, input: Input) {
        let effects = self.controller.dispatch(input);
        self.driver.apply(effects);
    }

    /// Waits for the next timer or fetch completion
    pub async fn recv(&mut self) -> Option<Input> {
        self.input_rx.recv().await
    }

    /// Dispatches every timer and fetch completion that is already available,
    /// returning how many were processed
    pub fn drain(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(input) = self.input_rx.try_recv() {
            self.dispatch(input);
            processed += 1;
        }
        processed
    }
}
