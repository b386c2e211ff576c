//! # RSVP Reader Library (rsvp-reader)
//!
//! Rapid serial visual presentation: a document is flattened into words and
//! shown one chunk at a time at a fixed point on screen, each chunk split at
//! its optimal recognition point so the eye does not move.
//!
//! **Architecture:**
//! - `playback`: the engine (state machine, timing, ORP, navigation, events)
//! - `ingest`: plain text and Markdown to a word sequence
//! - `terminal`: ANSI rendering of word events for the CLI

pub mod ingest;
pub mod playback;
pub mod terminal;

pub use playback::ReaderEngine;
pub use rsvp_common::{Error, Result};
