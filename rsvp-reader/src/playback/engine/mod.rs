//! RSVP playback engine
//!
//! **Module Structure:**
//! - `core.rs`: Engine struct, construction, state access, load/stop, configuration
//! - `playback.rs`: Play/pause transitions and the autoplay loop
//! - `navigation.rs`: Rewind, skip, jump and sentence boundary search

mod core;
mod navigation;
mod playback;

pub use self::core::ReaderEngine;
pub use navigation::{ends_sentence, find_sentence_end, find_sentence_start};
