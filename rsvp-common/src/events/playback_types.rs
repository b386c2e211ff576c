//! Playback-related type definitions
//!
//! Supporting types for playback status and event channel selection.

use serde::{Deserialize, Serialize};

/// Playback status of a reader engine
///
/// Derived from the last transition; never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// No sequence, freshly loaded, or stopped
    #[default]
    Idle,
    /// A step is scheduled
    Playing,
    /// Halted mid-sequence, resumable
    Paused,
    /// Position reached the end of the sequence
    Ended,
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackStatus::Idle => write!(f, "idle"),
            PlaybackStatus::Playing => write!(f, "playing"),
            PlaybackStatus::Paused => write!(f, "paused"),
            PlaybackStatus::Ended => write!(f, "ended"),
        }
    }
}

/// Event channel names
///
/// Closed set of channels a subscriber can register on. Each variant of
/// [`PlayerEvent`](super::PlayerEvent) belongs to exactly one kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Load,
    Play,
    Pause,
    Stop,
    End,
    Word,
    Progress,
    SpeedChange,
}

impl EventKind {
    /// All channels, in declaration order
    pub const ALL: [EventKind; 8] = [
        EventKind::Load,
        EventKind::Play,
        EventKind::Pause,
        EventKind::Stop,
        EventKind::End,
        EventKind::Word,
        EventKind::Progress,
        EventKind::SpeedChange,
    ];
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Load => write!(f, "load"),
            EventKind::Play => write!(f, "play"),
            EventKind::Pause => write!(f, "pause"),
            EventKind::Stop => write!(f, "stop"),
            EventKind::End => write!(f, "end"),
            EventKind::Word => write!(f, "word"),
            EventKind::Progress => write!(f, "progress"),
            EventKind::SpeedChange => write!(f, "speedChange"),
        }
    }
}
