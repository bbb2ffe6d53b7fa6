use super::*;
use crate::analysis::AudioAnalysis;
use crate::analysis::probe::AudioInfo;

fn analysis(text: &str) -> AudioAnalysis {
    AudioAnalysis::from_text(
        text,
        AudioInfo {
            duration_secs: 60.0,
            sample_rate: 44_100,
        },
        None,
    )
}

#[test]
fn one_keyframe_per_phoneme_at_its_start() {
    let a = analysis("Hello, world. Great day!");
    let lip = LipSyncData::from_analysis(&a);
    assert_eq!(lip.keyframes.len(), a.phonemes.len());
    for (kf, p) in lip.keyframes.iter().zip(&a.phonemes) {
        assert_eq!(kf.time, p.start);
        assert_eq!(kf.viseme, p.symbol);
        assert_eq!(kf.intensity, p.intensity);
    }
}

#[test]
fn smoothing_keeps_endpoints_and_averages_interior() {
    let a = analysis("mama");
    let lip = LipSyncData::from_analysis(&a);
    let shapes: Vec<MouthShape> = lip.keyframes.iter().map(|k| k.mouth_shape).collect();

    assert_eq!(shapes[0], mouth_shape("M"));
    assert_eq!(shapes[3], mouth_shape("AH"));

    // Interior keyframe 1 ("AH") averages M, AH, M from the raw shapes.
    let expected = (0.0 + 0.8 + 0.0) / 3.0;
    assert!((shapes[1].openness - expected).abs() < 1e-12);
    // Keyframe 2 ("M") averages AH, M, AH from the raw shapes, not the smoothed keyframe 1.
    let expected = (0.8 + 0.0 + 0.8) / 3.0;
    assert!((shapes[2].openness - expected).abs() < 1e-12);
}

#[test]
fn short_sequences_are_not_smoothed() {
    let a = analysis("oh");
    let lip = LipSyncData::from_analysis(&a);
    assert_eq!(lip.keyframes[0].mouth_shape, mouth_shape("OH"));
    assert_eq!(lip.keyframes[1].mouth_shape, mouth_shape("HH"));
}

#[test]
fn unknown_visemes_rest() {
    assert_eq!(mouth_shape("SIL"), MouthShape::REST);
    assert_eq!(mouth_shape("ZH"), MouthShape::REST);
    assert!(mouth_shape("AH").openness > mouth_shape("IH").openness);
    assert_eq!(mouth_shape("P").openness, 0.0);
}

#[test]
fn every_curve_has_one_sample_per_keyframe() {
    let a = analysis("Pure magic, truly!");
    let lip = LipSyncData::from_analysis(&a);
    assert_eq!(lip.blend_shapes.len(), BLEND_SHAPES.len());
    for curve in &lip.blend_shapes {
        assert_eq!(curve.values.len(), lip.keyframes.len());
        for (s, kf) in curve.values.iter().zip(&lip.keyframes) {
            assert_eq!(s.time, kf.time);
            let want = blend_shape_influence(&curve.name, &kf.viseme) * kf.intensity;
            assert_eq!(s.value, want);
            if blend_shape_influence(&curve.name, &kf.viseme) == 0.0 {
                assert_eq!(s.value, 0.0);
            }
        }
    }
}

#[test]
fn influence_table_spot_checks() {
    assert_eq!(blend_shape_influence("mouthClose", "M"), 1.0);
    assert_eq!(blend_shape_influence("jawOpen", "M"), 0.0);
    assert_eq!(blend_shape_influence("mouthPucker", "UH"), 0.9);
    assert_eq!(blend_shape_influence("unknownShape", "AH"), 0.0);
}

#[test]
fn curve_lookup_by_name() {
    let lip = LipSyncData::from_analysis(&analysis("ah"));
    let jaw = lip.curve("jawOpen").unwrap();
    assert!(jaw.values[0].value > 0.0);
    assert!(lip.curve("browUp").is_none());
}
