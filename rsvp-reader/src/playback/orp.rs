//! Optimal recognition point (ORP) splitting
//!
//! The ORP is the letter the eye should fixate on. It sits slightly left of
//! centre: about 35% into the word for anything longer than three letters.
//! The index is computed on a cleaned length (letters, digits, Latin-1
//! accented letters, apostrophes and hyphens) but applied to the original
//! string, so leading punctuation shifts the highlight left.

/// Fraction of the clean length at which the ORP falls for longer words
const ORP_RATIO: f64 = 0.35;

/// A string split around its ORP character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrpSplit {
    /// Characters before the ORP
    pub before: String,
    /// The ORP character, empty when the index is out of bounds
    pub orp_char: String,
    /// Characters after the ORP
    pub after: String,
    /// Character index of the ORP
    pub orp_index: usize,
    /// Character count of the original string
    pub length: usize,
}

/// Characters that count towards the ORP length: `[A-Za-z0-9À-ÿ'-]`
fn counts_for_orp(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('\u{C0}'..='\u{FF}').contains(&c) || c == '\'' || c == '-'
}

/// ORP index for a word whose cleaned length is `len`
pub fn orp_index_for_length(len: usize) -> usize {
    match len {
        0..=2 => 0,
        3 => 1,
        _ => (len as f64 * ORP_RATIO).floor() as usize,
    }
}

/// Split `word` at its ORP.
///
/// Works on whole display chunks too: a multi-word chunk is treated as one
/// string, spaces excluded from the length.
pub fn split_at_orp(word: &str) -> OrpSplit {
    let clean_len = word.chars().filter(|&c| counts_for_orp(c)).count();
    let orp_index = orp_index_for_length(clean_len);

    let chars: Vec<char> = word.chars().collect();
    let (before, orp_char, after) = if orp_index < chars.len() {
        (
            chars[..orp_index].iter().collect(),
            chars[orp_index].to_string(),
            chars[orp_index + 1..].iter().collect(),
        )
    } else {
        (word.to_string(), String::new(), String::new())
    };

    OrpSplit {
        before,
        orp_char,
        after,
        orp_index,
        length: chars.len(),
    }
}
