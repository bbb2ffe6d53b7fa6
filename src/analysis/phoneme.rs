//! Rule-based text to phoneme timeline.
//!
//! Every character is one phoneme slot of [`CHAR_SECS`]; words are separated by an extra
//! [`WORD_GAP_SECS`] of silence. Characters without a mapping become [`SILENCE`].

use crate::analysis::Phoneme;

/// Time allotted to one character.
pub const CHAR_SECS: f64 = 0.1;
/// Extra gap inserted after every word.
pub const WORD_GAP_SECS: f64 = 0.2;
/// Symbol for unmapped characters.
pub const SILENCE: &str = "SIL";

/// Map one lowercase character to its phoneme class.
pub fn char_phoneme(c: char) -> &'static str {
    match c {
        'a' => "AH",
        'e' => "EH",
        'i' => "IH",
        'o' => "OH",
        'u' => "UH",
        'b' => "B",
        'c' | 'k' | 'q' => "K",
        'd' => "D",
        'f' => "F",
        'g' => "G",
        'h' => "HH",
        'j' => "JH",
        'l' => "L",
        'm' => "M",
        'n' => "N",
        'p' => "P",
        'r' => "R",
        's' => "S",
        't' => "T",
        'v' => "V",
        'w' => "W",
        'x' => "KS",
        'y' => "Y",
        'z' => "Z",
        _ => SILENCE,
    }
}

/// Articulation strength for a phoneme class. Vowels are voiced hardest.
pub fn phoneme_intensity(symbol: &str) -> f64 {
    match symbol {
        "AH" | "EH" | "IH" | "OH" | "UH" => 0.9,
        SILENCE => 0.5,
        _ => 0.7,
    }
}

/// Length of `word` in timeline slots.
pub(crate) fn word_slots(word: &str) -> f64 {
    word.chars().count() as f64 * CHAR_SECS
}

/// Total timeline length covered by `text` (including the trailing word gap).
pub fn text_span_secs(text: &str) -> f64 {
    text.split(' ').map(|w| word_slots(w) + WORD_GAP_SECS).sum()
}

/// Build the phoneme timeline for `text`, one phoneme per non-space character.
pub fn text_to_phonemes(text: &str) -> Vec<Phoneme> {
    let mut out = Vec::with_capacity(text.len());
    let mut word_start = 0.0;

    for word in text.split(' ') {
        let mut offset = 0.0;
        for c in word.chars() {
            // One slot per source character, even when lowercasing expands it.
            let symbol = char_phoneme(c.to_lowercase().next().unwrap_or(c));
            let start = word_start + offset;
            out.push(Phoneme {
                symbol: symbol.to_string(),
                start,
                end: start + CHAR_SECS,
                intensity: phoneme_intensity(symbol),
            });
            offset += CHAR_SECS;
        }
        word_start += word_slots(word) + WORD_GAP_SECS;
    }

    out
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/phoneme.rs"]
mod tests;
