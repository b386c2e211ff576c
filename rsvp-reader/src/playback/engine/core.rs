//! Core reader engine - state, lifecycle and configuration
//!
//! **Responsibilities:**
//! - ReaderEngine struct definition and construction
//! - Locked state access and event dispatch
//! - Load, stop and configuration changes
//! - Step scheduling and cancellation
//!
//! State lives behind one mutex that is never held while callbacks run.
//! Operations queue the events they produce on the engine's outbox while
//! still holding the lock, so the outbox order is the order state changed.
//! After releasing the lock they flush: one caller at a time drains the
//! outbox to subscribers. A caller that finds delivery already in progress
//! (another thread, or a callback re-entering the engine) leaves its events
//! to that drainer.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rsvp_common::events::{EventKind, PlaybackStatus, PlayerEvent, ProgressInfo, WordInfo};
use rsvp_common::human_time::progress_info;
use rsvp_common::{ReaderConfig, Result};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::playback::events::{EventBus, Subscription, SubscriptionId};
use crate::playback::orp::split_at_orp;
use crate::playback::scheduler::{ScheduledStep, StepScheduler, TokioScheduler};

/// The one outstanding autoplay step
struct PendingStep {
    generation: u64,
    handle: ScheduledStep,
}

/// Mutable engine state
pub(super) struct EngineState {
    pub(super) words: Arc<[String]>,
    pub(super) position: usize,
    pub(super) status: PlaybackStatus,
    pub(super) config: ReaderConfig,
    pending: Option<PendingStep>,
    /// Incremented for every scheduled step; a firing step whose generation
    /// is not the pending one is stale and does nothing
    generation: u64,
    /// Events emitted but not yet delivered, in emission order
    outbox: VecDeque<PlayerEvent>,
    /// Set while some caller is draining the outbox
    delivering: bool,
}

impl EngineState {
    fn new(config: ReaderConfig) -> Self {
        Self {
            words: Arc::from(Vec::new()),
            position: 0,
            status: PlaybackStatus::Idle,
            config,
            pending: None,
            generation: 0,
            outbox: VecDeque::new(),
            delivering: false,
        }
    }

    /// Queue `event` for delivery once the lock is released
    pub(super) fn emit(&mut self, event: PlayerEvent) {
        self.outbox.push_back(event);
    }

    pub(super) fn len(&self) -> usize {
        self.words.len()
    }

    /// Space-joined chunk of `chunk_size` words at `index` (fewer at the tail)
    pub(super) fn display_chunk(&self, index: usize) -> String {
        let start = index.min(self.len());
        let end = (start + self.config.chunk_size()).min(self.len());
        self.words[start..end].join(" ")
    }

    /// Word event payload for the chunk at `index`
    pub(super) fn word_info(&self, index: usize) -> WordInfo {
        let word = self.display_chunk(index);
        let split = split_at_orp(&word);
        WordInfo {
            index,
            before: split.before,
            orp_char: split.orp_char,
            after: split.after,
            orp_index: split.orp_index,
            word_length: split.length,
            word,
        }
    }

    pub(super) fn progress(&self) -> ProgressInfo {
        progress_info(self.position, self.len(), self.config.rate())
    }

    pub(super) fn is_step_pending(&self, generation: u64) -> bool {
        matches!(&self.pending, Some(p) if p.generation == generation)
    }

    /// Discard the outstanding step, if any
    pub(super) fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!("Cancelling step {}", pending.generation);
            pending.handle.cancel();
        }
    }

    /// Forget the outstanding step without cancelling it (it is running now)
    pub(super) fn clear_pending(&mut self) {
        self.pending = None;
    }
}

pub(super) struct EngineInner {
    state: Mutex<EngineState>,
    bus: Arc<EventBus>,
    scheduler: Arc<dyn StepScheduler>,
}

impl Drop for EngineInner {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        state.cancel_pending();
    }
}

/// RSVP playback engine
///
/// Owns a word sequence and plays it back chunk by chunk, emitting
/// [`PlayerEvent`]s. All operations are synchronous and infallible: out of
/// range input is clamped. Independent engines share no state.
///
/// Subscribers see events in the order the state changed. An operation
/// delivers its own events before returning, unless it is called from a
/// callback or while another thread is delivering; its events then follow
/// the ones already queued.
///
/// The default scheduler needs a Tokio runtime; construct the engine from
/// inside one, or supply a scheduler with [`ReaderEngine::with_scheduler`].
pub struct ReaderEngine {
    pub(super) inner: Arc<EngineInner>,
}

impl ReaderEngine {
    /// Engine scheduling steps on the current Tokio runtime
    pub fn new(config: ReaderConfig) -> Result<Self> {
        let scheduler = TokioScheduler::current()?;
        Ok(Self::with_scheduler(config, Arc::new(scheduler)))
    }

    /// Engine scheduling steps on `scheduler`
    pub fn with_scheduler(config: ReaderConfig, scheduler: Arc<dyn StepScheduler>) -> Self {
        debug!(
            "Reader engine created: {} wpm, chunk size {}",
            config.rate(),
            config.chunk_size()
        );
        Self {
            inner: Arc::new(EngineInner {
                state: Mutex::new(EngineState::new(config)),
                bus: Arc::new(EventBus::default()),
                scheduler,
            }),
        }
    }

    pub(super) fn from_inner(inner: Arc<EngineInner>) -> Self {
        Self { inner }
    }

    pub(super) fn state(&self) -> MutexGuard<'_, EngineState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver queued events. The state lock must not be held.
    ///
    /// Returns at once if another caller is already delivering; that caller
    /// picks up everything queued before it finds the outbox empty.
    pub(super) fn flush(&self) {
        {
            let mut state = self.state();
            if state.delivering {
                return;
            }
            state.delivering = true;
        }
        let mut delivery = Delivery {
            engine: self,
            active: true,
        };

        loop {
            let event = {
                let mut state = self.state();
                match state.outbox.pop_front() {
                    Some(event) => event,
                    None => {
                        // Cleared under the same lock that saw the outbox
                        // empty, so no queued event is left without a drainer
                        state.delivering = false;
                        delivery.active = false;
                        return;
                    }
                }
            };
            self.inner.bus.emit(event);
        }
    }

    /// Schedule the next autoplay iteration after `delay`
    pub(super) fn schedule_step(&self, state: &mut EngineState, delay: Duration) {
        state.cancel_pending();
        state.generation += 1;
        let generation = state.generation;

        let weak = Arc::downgrade(&self.inner);
        let handle = self.inner.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    ReaderEngine::from_inner(inner).run_step(generation);
                }
            }),
        );
        state.pending = Some(PendingStep { generation, handle });
    }

    // ===== Subscriptions =====

    /// Register `callback` for events of `kind`
    pub fn on<F>(&self, kind: EventKind, callback: F) -> Subscription
    where
        F: Fn(&PlayerEvent) + Send + Sync + 'static,
    {
        let id = self.inner.bus.on(kind, callback);
        Subscription::new(id, kind, &self.inner.bus)
    }

    /// Remove a specific callback
    pub fn off(&self, kind: EventKind, id: SubscriptionId) -> bool {
        self.inner.bus.off(kind, id)
    }

    /// Async mirror of every emitted event
    pub fn subscribe_events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.inner.bus.subscribe()
    }

    // ===== Lifecycle =====

    /// Replace the word sequence and reset playback.
    ///
    /// `start_index` is clamped into the new sequence. Any pending step is
    /// cancelled and status returns to `Idle`.
    pub fn load<I, S>(&self, words: I, start_index: usize)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        {
            let mut state = self.state();
            state.cancel_pending();

            let total = words.len();
            let start_index = start_index.min(total.saturating_sub(1));
            state.words = Arc::from(words);
            state.position = start_index;
            state.status = PlaybackStatus::Idle;

            info!("Loaded {} words, starting at {}", total, start_index);
            state.emit(PlayerEvent::Load { total, start_index });
        }
        self.flush();
    }

    /// Cancel autoplay and return to `Idle`, keeping the position
    pub fn stop(&self) {
        {
            let mut state = self.state();
            state.cancel_pending();
            let old_status = state.status;
            state.status = PlaybackStatus::Idle;
            info!("Playback stopped at {} ({} -> idle)", state.position, old_status);
            let index = state.position;
            state.emit(PlayerEvent::Stop { index });
        }
        self.flush();
    }

    // ===== Configuration =====

    /// Set the reading rate (clamped to 50..=1500 wpm).
    ///
    /// An already scheduled step keeps its delay; the new rate applies from
    /// the next one.
    pub fn set_speed(&self, rate: i64) {
        {
            let mut state = self.state();
            let rate = state.config.set_rate(rate);
            debug!("Speed set to {} wpm", rate);
            state.emit(PlayerEvent::SpeedChange { rate });
        }
        self.flush();
    }

    /// Set the number of words per chunk (clamped to 1..=3)
    pub fn set_chunk_size(&self, size: i64) {
        let size = self.state().config.set_chunk_size(size);
        debug!("Chunk size set to {}", size);
    }

    // ===== Readable state =====

    /// Current playback position
    pub fn current_index(&self) -> usize {
        self.state().position
    }

    /// Number of words loaded
    pub fn total_words(&self) -> usize {
        self.state().len()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.state().status
    }

    pub fn is_playing(&self) -> bool {
        self.status() == PlaybackStatus::Playing
    }

    pub fn config(&self) -> ReaderConfig {
        self.state().config
    }

    /// The loaded word sequence
    pub fn words(&self) -> Arc<[String]> {
        Arc::clone(&self.state().words)
    }

    /// Progress snapshot at the current position; no side effects
    pub fn progress(&self) -> ProgressInfo {
        self.state().progress()
    }
}

/// Clears the delivering flag if a callback panics mid-flush
struct Delivery<'a> {
    engine: &'a ReaderEngine,
    active: bool,
}

impl Drop for Delivery<'_> {
    fn drop(&mut self) {
        if self.active {
            self.engine.state().delivering = false;
        }
    }
}

impl std::fmt::Debug for ReaderEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("ReaderEngine")
            .field("total_words", &state.len())
            .field("position", &state.position)
            .field("status", &state.status)
            .field("config", &state.config)
            .finish()
    }
}
