//! # RSVP Common Library
//!
//! Shared code for the RSVP reader crates:
//! - Event types (PlayerEvent enum and payloads)
//! - Playback status
//! - Configuration loading
//! - Progress and reading-time formatting

pub mod config;
pub mod error;
pub mod events;
pub mod human_time;

pub use config::ReaderConfig;
pub use error::{Error, Result};
pub use events::{EventKind, PlaybackStatus, PlayerEvent};
