//! Hand-fired StepScheduler
//!
//! Records every scheduled step with its delay. Tests fire steps explicitly,
//! which makes the autoplay loop fully deterministic and lets a test run a
//! step that was already cancelled (the timer-fired-before-cancel race).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rsvp_reader::playback::scheduler::{ScheduledStep, StepFn, StepScheduler};

struct ManualStep {
    delay: Duration,
    step: Option<StepFn>,
    cancelled: Arc<AtomicBool>,
}

#[derive(Default)]
pub struct ManualScheduler {
    steps: Mutex<Vec<ManualStep>>,
}

impl ManualScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Delay of every step ever scheduled, in order
    pub fn delays(&self) -> Vec<Duration> {
        self.steps.lock().unwrap().iter().map(|s| s.delay).collect()
    }

    /// Delay of the most recently scheduled step
    pub fn last_delay(&self) -> Option<Duration> {
        self.steps.lock().unwrap().last().map(|s| s.delay)
    }

    /// Steps neither run nor cancelled
    pub fn pending_count(&self) -> usize {
        self.steps
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.step.is_some() && !s.cancelled.load(Ordering::SeqCst))
            .count()
    }

    /// Run the oldest live step. Returns false if there was none.
    pub fn fire_next(&self) -> bool {
        let step = {
            let mut steps = self.steps.lock().unwrap();
            steps
                .iter_mut()
                .find(|s| s.step.is_some() && !s.cancelled.load(Ordering::SeqCst))
                .and_then(|s| s.step.take())
        };
        match step {
            Some(step) => {
                step();
                true
            }
            None => false,
        }
    }

    /// Fire live steps until none remain, up to `limit`; returns how many ran
    pub fn run_until_idle(&self, limit: usize) -> usize {
        let mut fired = 0;
        while fired < limit && self.fire_next() {
            fired += 1;
        }
        fired
    }

    /// Run every cancelled step that has not run yet, as if its timer had
    /// fired just before the cancellation landed. Returns how many ran.
    pub fn fire_cancelled(&self) -> usize {
        let stale: Vec<StepFn> = {
            let mut steps = self.steps.lock().unwrap();
            steps
                .iter_mut()
                .filter(|s| s.cancelled.load(Ordering::SeqCst))
                .filter_map(|s| s.step.take())
                .collect()
        };
        let count = stale.len();
        for step in stale {
            step();
        }
        count
    }
}

impl StepScheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, step: StepFn) -> ScheduledStep {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.steps.lock().unwrap().push(ManualStep {
            delay,
            step: Some(step),
            cancelled: Arc::clone(&cancelled),
        });
        ScheduledStep::new(move || cancelled.store(true, Ordering::SeqCst))
    }
}
