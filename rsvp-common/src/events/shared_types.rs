//! Shared type definitions for event data
//!
//! Payload structs carried by the `Word` and `Progress` events.

use serde::{Deserialize, Serialize};

/// A display chunk split at its optimal recognition point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WordInfo {
    /// Full chunk text (space-joined words)
    pub word: String,
    /// Position of the chunk's first word in the sequence
    pub index: usize,
    /// Text left of the ORP character
    pub before: String,
    /// The highlighted character (empty if the chunk is empty)
    pub orp_char: String,
    /// Text right of the ORP character
    pub after: String,
    /// Character index of the ORP within `word`
    pub orp_index: usize,
    /// Character count of `word`
    pub word_length: usize,
}

/// Reading progress snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressInfo {
    /// Current playback position
    pub current: usize,
    /// Total words in the sequence
    pub total: usize,
    /// Completion percentage, 0.0 to 100.0
    pub percent: f64,
    /// Words left after the current position
    pub words_remaining: usize,
    /// Human-readable reading time left, e.g. "12 min"
    pub time_remaining: String,
}
