//! Playback control methods for ReaderEngine
//!
//! **Responsibilities:**
//! - Play/pause/toggle transitions
//! - The autoplay loop: one iteration per scheduled step

use std::time::Duration;

use rsvp_common::events::{PlaybackStatus, PlayerEvent};
use tracing::{debug, info};

use super::core::EngineState;
use super::ReaderEngine;
use crate::playback::timing::word_delay_ms;

impl ReaderEngine {
    /// Start or resume autoplay.
    ///
    /// No-op on an empty sequence or when already playing. Restarts from the
    /// first word once the end has been reached. The first chunk is emitted
    /// before this returns.
    pub fn play(&self) {
        {
            let mut state = self.state();
            if state.words.is_empty() {
                debug!("Play ignored: no words loaded");
                return;
            }
            if state.status == PlaybackStatus::Playing {
                debug!("Play ignored: already playing");
                return;
            }
            if state.position >= state.len() {
                state.position = 0;
            }

            let old_status = state.status;
            state.status = PlaybackStatus::Playing;
            info!(
                "Playback state changed: {} -> playing at {}",
                old_status, state.position
            );

            let index = state.position;
            state.emit(PlayerEvent::Play { index });
            self.autoplay_iteration(&mut state);
        }
        self.flush();
    }

    /// Halt autoplay, keeping the position. Safe to call repeatedly.
    pub fn pause(&self) {
        {
            let mut state = self.state();
            state.cancel_pending();
            let old_status = state.status;
            state.status = PlaybackStatus::Paused;
            info!(
                "Playback state changed: {} -> paused at {}",
                old_status, state.position
            );
            let index = state.position;
            state.emit(PlayerEvent::Pause { index });
        }
        self.flush();
    }

    /// Pause if playing, otherwise play
    pub fn toggle_play(&self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Entry point of a scheduled step
    pub(super) fn run_step(&self, generation: u64) {
        {
            let mut state = self.state();
            if !state.is_step_pending(generation) {
                debug!("Stale step {} ignored", generation);
                return;
            }
            state.clear_pending();
            if state.status != PlaybackStatus::Playing {
                return;
            }
            self.autoplay_iteration(&mut state);
        }
        self.flush();
    }

    /// One autoplay iteration: emit the current chunk and schedule the next,
    /// or end playback when the position has run off the sequence.
    fn autoplay_iteration(&self, state: &mut EngineState) {
        let total = state.len();
        if state.position >= total {
            state.status = PlaybackStatus::Ended;
            info!("Playback ended after {} words", total);
            state.emit(PlayerEvent::End { total });
            return;
        }

        let word = state.word_info(state.position);
        let progress = state.progress();
        let delay_ms = word_delay_ms(&word.word, state.config.rate());
        debug!(
            "Step at {}: {:?} for {} ms",
            state.position, word.word, delay_ms
        );

        state.position = (state.position + state.config.chunk_size()).min(total);
        self.schedule_step(state, Duration::from_millis(delay_ms));

        state.emit(PlayerEvent::Word(word));
        state.emit(PlayerEvent::Progress(progress));
    }
}
