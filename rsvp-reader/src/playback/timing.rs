//! Per-chunk display timing
//!
//! A chunk stays on screen for one word-slot at the current rate, scaled by
//! a modifier built from its length and trailing punctuation:
//!
//! `modifier = length_factor + punctuation_bonus (+ paragraph_bonus)`
//!
//! The punctuation bonus is added to the length factor, not multiplied into
//! it: "cat." at 300 wpm is `200 * (0.8 + 1.0) = 360` ms.

/// Length factor for chunks of at most `SHORT_CHUNK_LEN` alphanumerics
const SHORT_FACTOR: f64 = 0.8;
const SHORT_CHUNK_LEN: usize = 3;
/// Length factor for chunks of at least `LONG_CHUNK_LEN` alphanumerics
const LONG_FACTOR: f64 = 1.2;
const LONG_CHUNK_LEN: usize = 8;

const SENTENCE_BONUS: f64 = 1.0;
const CLAUSE_BONUS: f64 = 0.6;
const CLOSING_BONUS: f64 = 0.3;
const PARAGRAPH_BONUS: f64 = 1.5;

/// Pilcrow left in a token by ingestion to mark a paragraph break
pub const PARAGRAPH_MARK: char = '¶';

/// True for `.`, `!` and `?`
pub fn is_sentence_end(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_clause_end(c: char) -> bool {
    matches!(c, ',' | ';' | ':')
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | '\u{201D}' | '\u{2019}')
}

/// Length factor from the chunk's alphanumeric character count
fn length_factor(chunk: &str) -> f64 {
    let len = chunk.chars().filter(|c| c.is_alphanumeric()).count();
    if len <= SHORT_CHUNK_LEN {
        SHORT_FACTOR
    } else if len >= LONG_CHUNK_LEN {
        LONG_FACTOR
    } else {
        1.0
    }
}

/// Bonus for the raw last character; only one case applies
fn punctuation_bonus(chunk: &str) -> f64 {
    match chunk.chars().last() {
        Some(c) if is_sentence_end(c) => SENTENCE_BONUS,
        Some(c) if is_clause_end(c) => CLAUSE_BONUS,
        Some(c) if is_closing(c) => CLOSING_BONUS,
        _ => 0.0,
    }
}

fn has_paragraph_break(chunk: &str) -> bool {
    chunk.contains('\n') || chunk.contains(PARAGRAPH_MARK)
}

/// Combined delay modifier for a chunk
pub fn delay_modifier(chunk: &str) -> f64 {
    let mut modifier = length_factor(chunk) + punctuation_bonus(chunk);
    if has_paragraph_break(chunk) {
        modifier += PARAGRAPH_BONUS;
    }
    modifier
}

/// How long `chunk` stays on screen at `rate` words per minute, in ms.
pub fn word_delay_ms(chunk: &str, rate: u32) -> u64 {
    let base = 60_000.0 / rate.max(1) as f64;
    (base * delay_modifier(chunk)).round() as u64
}
