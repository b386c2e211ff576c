//! Deferred step scheduling
//!
//! The autoplay loop never sleeps itself. Each iteration asks a
//! [`StepScheduler`] to run the next iteration after a delay and keeps the
//! returned [`ScheduledStep`] so it can discard it before any transition that
//! must pre-empt it (load, pause, stop).

use std::time::Duration;

use rsvp_common::{Error, Result};
use tokio::runtime::Handle;
use tracing::trace;

/// Work to run once the delay elapses
pub type StepFn = Box<dyn FnOnce() + Send + 'static>;

/// Schedules a single deferred step.
///
/// Implementations must not run `step` before `schedule` returns; the engine
/// calls `schedule` while holding its state lock.
pub trait StepScheduler: Send + Sync {
    fn schedule(&self, delay: Duration, step: StepFn) -> ScheduledStep;
}

/// Handle to a scheduled step
///
/// Dropping the handle leaves the step scheduled; call [`cancel`](Self::cancel)
/// to discard it.
pub struct ScheduledStep {
    cancel: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl ScheduledStep {
    /// Handle whose cancellation runs `cancel`
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Handle with nothing to cancel
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    /// Discard the step. It will not run if it has not started yet.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for ScheduledStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledStep")
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

/// Scheduler backed by Tokio timers
///
/// Each step is a spawned task that sleeps then runs; cancelling aborts the
/// task.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Scheduler on an explicit runtime
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Scheduler on the runtime the caller is running in
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| Error::Runtime(format!("no Tokio runtime available: {}", e)))
    }
}

impl StepScheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, step: StepFn) -> ScheduledStep {
        trace!("Scheduling step in {:?}", delay);
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            step();
        });
        ScheduledStep::new(move || task.abort())
    }
}
