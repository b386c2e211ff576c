//! Navigation methods for ReaderEngine
//!
//! Rewind, skip and jump move the position without touching play/pause
//! status. Without an explicit count, rewind and skip move by sentence.

use rsvp_common::events::PlayerEvent;
use tracing::debug;

use super::core::EngineState;
use super::ReaderEngine;
use crate::playback::timing::is_sentence_end;

/// True if the word's last character is `.`, `!` or `?`
pub fn ends_sentence(word: &str) -> bool {
    word.chars().last().is_some_and(is_sentence_end)
}

/// Start of the sentence containing `index`.
///
/// Scans backward from `index - 1` and returns the position right after the
/// first sentence-ending word found, or 0.
pub fn find_sentence_start<S: AsRef<str>>(words: &[S], index: usize) -> usize {
    let upper = index.min(words.len());
    (0..upper)
        .rev()
        .find(|&i| ends_sentence(words[i].as_ref()))
        .map_or(0, |i| i + 1)
}

/// Start of the next sentence at or after `index`.
///
/// Scans forward from `index` (inclusive) and returns the position right
/// after the first sentence-ending word, clamped to the last word. Returns
/// the last word when no sentence end follows.
pub fn find_sentence_end<S: AsRef<str>>(words: &[S], index: usize) -> usize {
    let last = words.len().saturating_sub(1);
    (index..words.len())
        .find(|&i| ends_sentence(words[i].as_ref()))
        .map_or(last, |i| (i + 1).min(last))
}

impl ReaderEngine {
    /// Move back `count` words (floored at 0), or to the start of the
    /// current sentence when `count` is `None`.
    pub fn rewind(&self, count: Option<usize>) {
        self.navigate("rewind", |state| match count {
            Some(n) => state.position.saturating_sub(n),
            None => find_sentence_start(&state.words[..], state.position),
        });
    }

    /// Move forward `count` words (capped at the last word), or to the start
    /// of the next sentence when `count` is `None`.
    pub fn skip(&self, count: Option<usize>) {
        self.navigate("skip", |state| match count {
            Some(n) => state.position.saturating_add(n),
            None => find_sentence_end(&state.words[..], state.position),
        });
    }

    /// Move to `index`, clamped into the sequence
    pub fn jump_to(&self, index: i64) {
        self.navigate("jump", |state| {
            usize::try_from(index.max(0)).unwrap_or(usize::MAX).min(state.len())
        });
    }

    /// Start of the sentence containing `index` in the loaded sequence
    pub fn find_sentence_start(&self, index: usize) -> usize {
        find_sentence_start(&self.state().words[..], index)
    }

    /// Start of the next sentence at or after `index` in the loaded sequence
    pub fn find_sentence_end(&self, index: usize) -> usize {
        find_sentence_end(&self.state().words[..], index)
    }

    /// Set the position from `target`, clamp it to the last word, and emit the
    /// chunk there plus progress. Does nothing on an empty sequence.
    fn navigate(&self, action: &str, target: impl FnOnce(&EngineState) -> usize) {
        {
            let mut state = self.state();
            if state.words.is_empty() {
                debug!("{} ignored: no words loaded", action);
                return;
            }

            let from = state.position;
            let to = target(&state).min(state.len() - 1);
            state.position = to;
            debug!("{}: {} -> {}", action, from, state.position);

            let word = state.word_info(to);
            let progress = state.progress();
            state.emit(PlayerEvent::Word(word));
            state.emit(PlayerEvent::Progress(progress));
        }
        self.flush();
    }
}
