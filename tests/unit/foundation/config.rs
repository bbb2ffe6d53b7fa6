use super::*;

#[test]
fn defaults_are_valid() {
    let cfg = RenderConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.fps.as_f64(), 30.0);
    assert_eq!(cfg.fallback_duration_secs, 60.0);
    assert_eq!(cfg.fallback_sample_rate, 44_100);
    assert_eq!(cfg.gestures.idle_interval_secs, 3.0);
}

#[test]
fn quality_tiers_scale_up() {
    let table = QualityTable::default();
    let draft = table.profile(Quality::Draft);
    let ultra = table.profile(Quality::Ultra);
    assert!(draft.resolution.width < ultra.resolution.width);
    assert!(draft.crf > ultra.crf);
    assert_eq!(table.profile(Quality::Standard).resolution.height, 720);
}

#[test]
fn validate_rejects_bad_values() {
    let cfg = RenderConfig {
        codec: " ".to_string(),
        ..RenderConfig::default()
    };
    assert!(cfg.validate().is_err());

    let mut cfg = RenderConfig::default();
    cfg.gestures.idle_interval_secs = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = RenderConfig::default();
    cfg.quality.high.resolution.width = 1921;
    assert!(cfg.validate().is_err());

    let cfg = RenderConfig {
        fallback_duration_secs: f64::NAN,
        ..RenderConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn partial_json_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg.json");
    std::fs::write(
        &path,
        r#"{ "fps": { "num": 24, "den": 1 }, "gestures": { "seed": 9 } }"#,
    )
    .unwrap();

    let cfg = RenderConfig::from_path(&path).unwrap();
    assert_eq!(cfg.fps.num, 24);
    assert_eq!(cfg.gestures.seed, Some(9));
    assert_eq!(cfg.gestures.pause_reaction_secs, 0.5);
    assert_eq!(cfg.codec, "libx264");
}

#[test]
fn malformed_json_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = RenderConfig::from_path(&path).unwrap_err();
    assert!(matches!(err, AvatarError::Validation(_)));
}
