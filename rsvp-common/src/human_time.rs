//! Human-readable reading progress
//!
//! Provides the progress snapshot and "time remaining" label shown next to
//! the reader.

use crate::events::ProgressInfo;

/// Minutes in an hour, the threshold for switching to the `Xh Ym` format
const HOUR_MINUTES: f64 = 60.0;

/// Format the reading time left for `words_remaining` words at `rate` wpm.
///
/// - under one minute: `"< 1 min"`
/// - under one hour: `"{ceil(minutes)} min"`
/// - otherwise: `"{hours}h {ceil(minutes mod 60)}m"`
///
/// # Examples
///
/// ```
/// use rsvp_common::human_time::format_time_remaining;
///
/// assert_eq!(format_time_remaining(0, 300), "< 1 min");
/// assert_eq!(format_time_remaining(450, 300), "2 min");
/// assert_eq!(format_time_remaining(30_000, 300), "1h 40m");
/// ```
pub fn format_time_remaining(words_remaining: usize, rate: u32) -> String {
    let minutes = words_remaining as f64 / rate.max(1) as f64;

    if minutes < 1.0 {
        "< 1 min".to_string()
    } else if minutes < HOUR_MINUTES {
        format!("{} min", minutes.ceil() as u64)
    } else {
        let hours = (minutes / HOUR_MINUTES).floor() as u64;
        let rest = (minutes % HOUR_MINUTES).ceil() as u64;
        format!("{}h {}m", hours, rest)
    }
}

/// Build a progress snapshot for position `current` of `total` words.
///
/// `percent` is capped at 100 and is 0 for an empty sequence;
/// `words_remaining` never goes negative.
pub fn progress_info(current: usize, total: usize, rate: u32) -> ProgressInfo {
    let percent = if total == 0 {
        0.0
    } else {
        (100.0 * current as f64 / total as f64).min(100.0)
    };
    let words_remaining = total.saturating_sub(current);

    ProgressInfo {
        current,
        total,
        percent,
        words_remaining,
        time_remaining: format_time_remaining(words_remaining, rate),
    }
}
