use super::*;

#[test]
fn reads_format_duration_and_stream_rate() {
    let json = br#"{
        "streams": [
            { "codec_type": "video", "width": 64, "height": 64 },
            { "codec_type": "audio", "sample_rate": "48000", "duration": "9.5" }
        ],
        "format": { "duration": "12.250000" }
    }"#;
    let info = parse_ffprobe_json(json).unwrap();
    assert_eq!(info.sample_rate, 48_000);
    assert!((info.duration_secs - 12.25).abs() < 1e-9);
}

#[test]
fn falls_back_to_stream_duration() {
    let json = br#"{
        "streams": [{ "codec_type": "audio", "sample_rate": "22050", "duration": "3.0" }],
        "format": {}
    }"#;
    let info = parse_ffprobe_json(json).unwrap();
    assert_eq!(info.duration_secs, 3.0);
}

#[test]
fn rejects_sources_without_audio() {
    let json = br#"{ "streams": [{ "codec_type": "video" }], "format": { "duration": "1" } }"#;
    let err = parse_ffprobe_json(json).unwrap_err();
    assert!(err.to_string().contains("no audio stream"));
}

#[test]
fn rejects_garbage() {
    assert!(parse_ffprobe_json(b"not json").is_err());
}

#[tokio::test]
async fn missing_binary_is_an_error_not_a_panic() {
    let probe = FfprobeAudioProbe::with_binary("definitely-not-ffprobe-on-path");
    let err = probe.probe("/nonexistent.wav").await.unwrap_err();
    assert!(matches!(err, AvatarError::Analysis(_)));
}
