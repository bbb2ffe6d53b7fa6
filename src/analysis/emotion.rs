//! Lexical emotion and pause detection.

use crate::analysis::phoneme::{CHAR_SECS, WORD_GAP_SECS, text_span_secs, word_slots};
use crate::analysis::{Emotion, EmotionSpan};

/// Confidence assigned to a keyword hit.
pub const KEYWORD_CONFIDENCE: f64 = 0.8;
/// Confidence of the fallback neutral span.
pub const NEUTRAL_CONFIDENCE: f64 = 0.9;

/// Characters that mark a pause.
pub const PAUSE_MARKS: [char; 4] = ['.', ',', ';', '!'];

/// Keyword buckets, English and Portuguese. Matching is by lowercase substring.
pub static EMOTION_KEYWORDS: [(Emotion, &[&str]); 4] = [
    (
        Emotion::Happy,
        &[
            "happy",
            "glad",
            "great",
            "excellent",
            "wonderful",
            "feliz",
            "alegre",
            "ótimo",
            "excelente",
            "maravilhoso",
        ],
    ),
    (
        Emotion::Sad,
        &[
            "sad", "terrible", "awful", "triste", "ruim", "péssimo", "terrível",
        ],
    ),
    (
        Emotion::Excited,
        &[
            "amazing",
            "fantastic",
            "exciting",
            "incredible",
            "incrível",
            "fantástico",
            "empolgante",
            "animado",
        ],
    ),
    (
        Emotion::Calm,
        &[
            "calm",
            "peaceful",
            "serene",
            "tranquil",
            "calmo",
            "sereno",
            "pacífico",
        ],
    ),
];

/// Emotions whose keyword list matches `word`.
pub fn word_emotions(word: &str) -> impl Iterator<Item = Emotion> {
    let lower = word.to_lowercase();
    EMOTION_KEYWORDS
        .iter()
        .filter(move |(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(emotion, _)| *emotion)
}

/// One span per keyword hit, timed on the same word grid as the phoneme timeline.
///
/// Falls back to a single neutral span covering the whole text when nothing matches.
pub fn detect_emotions(text: &str) -> Vec<EmotionSpan> {
    let mut spans = Vec::new();
    let mut cursor = 0.0;

    for word in text.split(' ') {
        let end = cursor + word_slots(word);
        for emotion in word_emotions(word) {
            spans.push(EmotionSpan {
                emotion,
                confidence: KEYWORD_CONFIDENCE,
                start: cursor,
                end,
            });
        }
        cursor = end + WORD_GAP_SECS;
    }

    if spans.is_empty() {
        spans.push(neutral_span(text_span_secs(text)));
    }
    spans
}

/// Neutral span from 0 to `end`.
pub fn neutral_span(end: f64) -> EmotionSpan {
    EmotionSpan {
        emotion: Emotion::Neutral,
        confidence: NEUTRAL_CONFIDENCE,
        start: 0.0,
        end,
    }
}

/// Timestamps of punctuation marks, advancing [`CHAR_SECS`] per character (spaces included).
pub fn detect_pauses(text: &str) -> Vec<f64> {
    text.chars()
        .enumerate()
        .filter(|(_, c)| PAUSE_MARKS.contains(c))
        .map(|(i, _)| i as f64 * CHAR_SECS)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/emotion.rs"]
mod tests;
