//! Terminal rendering of reader events
//!
//! Each chunk is drawn on one line with its ORP character in a fixed column,
//! so the highlighted letter never moves.

use rsvp_common::events::{ProgressInfo, WordInfo};

use crate::playback::timing::PARAGRAPH_MARK;

/// Column the ORP character is drawn in
pub const ORP_COLUMN: usize = 20;

const HIGHLIGHT: &str = "\x1b[1;31m";
const RESET: &str = "\x1b[0m";

fn strip_markers(text: &str) -> &str {
    text.trim_end_matches(|c: char| c == PARAGRAPH_MARK || c == '\n' || c == '\r')
}

/// One display line for `word`, ORP aligned to [`ORP_COLUMN`].
///
/// With `color`, the ORP character is bold red.
pub fn render_word(word: &WordInfo, color: bool) -> String {
    let pad = ORP_COLUMN.saturating_sub(word.before.chars().count());
    let orp = strip_markers(&word.orp_char);
    let after = strip_markers(&word.after);

    if color {
        format!(
            "{}{}{}{}{}{}",
            " ".repeat(pad),
            word.before,
            HIGHLIGHT,
            orp,
            RESET,
            after
        )
    } else {
        format!("{}{}{}{}", " ".repeat(pad), word.before, orp, after)
    }
}

/// Status suffix such as `"42.0% | 12 min left"`
pub fn render_progress(progress: &ProgressInfo) -> String {
    format!("{:.1}% | {} left", progress.percent, progress.time_remaining)
}
