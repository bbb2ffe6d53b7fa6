use super::*;

#[test]
fn keyword_maps_to_its_bucket() {
    let spans = detect_emotions("Hello, world. Great day!");
    assert_eq!(spans.len(), 1);
    let great = &spans[0];
    assert_eq!(great.emotion, Emotion::Happy);
    assert_eq!(great.confidence, KEYWORD_CONFIDENCE);
    // "Hello," (6) + gap, "world." (6) + gap => "Great" starts at 1.6 and lasts 0.5.
    assert!((great.start - 1.6).abs() < 1e-9);
    assert!((great.end - 2.1).abs() < 1e-9);
}

#[test]
fn no_keywords_yields_single_neutral_span() {
    let text = "The meeting starts at noon";
    let spans = detect_emotions(text);
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].emotion, Emotion::Neutral);
    assert_eq!(spans[0].confidence, NEUTRAL_CONFIDENCE);
    assert_eq!(spans[0].start, 0.0);
    assert!((spans[0].end - text_span_secs(text)).abs() < 1e-9);
}

#[test]
fn portuguese_keywords_match_case_insensitively() {
    let spans = detect_emotions("Foi INCRÍVEL e muito tranquilo");
    let emotions: Vec<Emotion> = spans.iter().map(|s| s.emotion).collect();
    assert_eq!(emotions, [Emotion::Excited, Emotion::Calm]);

    let spans = detect_emotions("Sereno e feliz");
    let emotions: Vec<Emotion> = spans.iter().map(|s| s.emotion).collect();
    assert_eq!(emotions, [Emotion::Calm, Emotion::Happy]);
}

#[test]
fn spans_are_time_ordered() {
    let spans = detect_emotions("sad news but amazing results and a calm finish");
    assert_eq!(spans.len(), 3);
    for w in spans.windows(2) {
        assert!(w[0].start <= w[1].start);
    }
}

#[test]
fn pauses_at_punctuation() {
    let pauses = detect_pauses("Hello, world. Great day!");
    // ',' at index 5, '.' at 12, '!' at 23.
    let expected = [0.5, 1.2, 2.3];
    assert_eq!(pauses.len(), expected.len());
    for (got, want) in pauses.iter().zip(expected) {
        assert!((got - want).abs() < 1e-9);
    }
}

#[test]
fn question_marks_are_not_pauses() {
    assert!(detect_pauses("Why? Because").is_empty());
    assert_eq!(detect_pauses("a;b").len(), 1);
}
