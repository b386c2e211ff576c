//! Test helpers for reader engine integration tests
//!
//! Provides reusable test infrastructure components:
//! - EventRecorder: capture every event an engine emits, in order
//! - ManualScheduler: a StepScheduler the test fires by hand

#![allow(dead_code)]

pub mod manual_scheduler;

pub use manual_scheduler::ManualScheduler;

use std::sync::{Arc, Mutex};

use rsvp_common::events::{EventKind, PlayerEvent, ProgressInfo, WordInfo};
use rsvp_reader::ReaderEngine;

/// Records events from every channel of an engine
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<PlayerEvent>>>,
}

impl EventRecorder {
    /// Subscribe to all event kinds on `engine`
    pub fn attach(engine: &ReaderEngine) -> Self {
        let recorder = Self::default();
        for kind in EventKind::ALL {
            let events = Arc::clone(&recorder.events);
            // Subscriptions live as long as the engine
            let _ = engine.on(kind, move |event| {
                events.lock().unwrap().push(event.clone());
            });
        }
        recorder
    }

    pub fn events(&self) -> Vec<PlayerEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events().iter().map(PlayerEvent::kind).collect()
    }

    /// Text of every word event, in order
    pub fn words(&self) -> Vec<String> {
        self.word_events().into_iter().map(|w| w.word).collect()
    }

    pub fn word_events(&self) -> Vec<WordInfo> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PlayerEvent::Word(word) => Some(word),
                _ => None,
            })
            .collect()
    }

    pub fn progress_events(&self) -> Vec<ProgressInfo> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PlayerEvent::Progress(progress) => Some(progress),
                _ => None,
            })
            .collect()
    }

    pub fn last(&self) -> Option<PlayerEvent> {
        self.events.lock().unwrap().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

/// The sentence fixture used across navigation tests
pub fn fox_words() -> Vec<String> {
    ["A", "quick.", "brown", "fox", "jumped."]
        .iter()
        .map(|w| w.to_string())
        .collect()
}
