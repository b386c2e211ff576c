//! Event types for the RSVP reader event system
//!
//! Every event the playback engine emits is a variant of [`PlayerEvent`].
//! Subscribers select a channel with [`EventKind`]; the payload shape is fixed
//! by the variant, so matching on the event is exhaustive and type-checked.

mod playback_types;
mod shared_types;

pub use playback_types::{EventKind, PlaybackStatus};
pub use shared_types::{ProgressInfo, WordInfo};

use serde::{Deserialize, Serialize};

/// Reader event types
///
/// Serialized with a `type` tag so the same enum can be written out as JSON
/// lines by front-ends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerEvent {
    /// A new word sequence replaced the previous one
    #[serde(rename_all = "camelCase")]
    Load {
        /// Number of words in the new sequence
        total: usize,
        /// Start index after clamping
        start_index: usize,
    },

    /// Autoplay started or resumed
    Play {
        /// Position playback starts from
        index: usize,
    },

    /// Autoplay paused; the position is resumable
    Pause {
        /// Position at the time of the pause
        index: usize,
    },

    /// Autoplay stopped without moving the position
    Stop {
        /// Position at the time of the stop
        index: usize,
    },

    /// Autoplay ran past the last word
    End {
        /// Number of words in the sequence
        total: usize,
    },

    /// A chunk should be displayed
    Word(WordInfo),

    /// Reading progress changed
    Progress(ProgressInfo),

    /// Reading rate changed
    SpeedChange {
        /// New rate in words per minute (after clamping)
        rate: u32,
    },
}

impl PlayerEvent {
    /// Channel this event is delivered on
    pub fn kind(&self) -> EventKind {
        match self {
            PlayerEvent::Load { .. } => EventKind::Load,
            PlayerEvent::Play { .. } => EventKind::Play,
            PlayerEvent::Pause { .. } => EventKind::Pause,
            PlayerEvent::Stop { .. } => EventKind::Stop,
            PlayerEvent::End { .. } => EventKind::End,
            PlayerEvent::Word(_) => EventKind::Word,
            PlayerEvent::Progress(_) => EventKind::Progress,
            PlayerEvent::SpeedChange { .. } => EventKind::SpeedChange,
        }
    }
}
