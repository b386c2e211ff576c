//! RSVP playback engine and its pure models

pub mod engine;
pub mod events;
pub mod orp;
pub mod scheduler;
pub mod timing;

pub use engine::ReaderEngine;
pub use events::{EventBus, Subscription, SubscriptionId};
pub use orp::{split_at_orp, OrpSplit};
pub use scheduler::{ScheduledStep, StepScheduler, TokioScheduler};
pub use timing::word_delay_ms;
