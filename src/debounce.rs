//! A cancellable scheduled task.

use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs at most one delayed action at a time.
///
/// Scheduling a new action aborts the pending one, so only the last action
/// of a burst ever runs. Must be used from within a tokio runtime.
#[derive(Debug, Default)]
pub struct Debouncer {
    task: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Creates an idle debouncer
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `action` once `delay` has elapsed, replacing any pending action
    pub fn schedule<F>(&mut self, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        }));
    }

    /// Drops the pending action, if any
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Whether an action is still waiting to run
    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
