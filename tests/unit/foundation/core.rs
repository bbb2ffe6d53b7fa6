use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn frames_cover_duration_with_ceil() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.secs_to_frames_ceil(60.0), 1800);
    assert_eq!(fps.secs_to_frames_ceil(0.01), 1);
    assert_eq!(fps.secs_to_frames_ceil(1.5), 45);
    assert_eq!(fps.secs_to_frames_ceil(0.0), 0);

    let ntsc = Fps::new(30000, 1001).unwrap();
    assert_eq!(ntsc.secs_to_frames_ceil(1.0), 30);
}

#[test]
fn frame_time_is_linear() {
    let fps = Fps::new(25, 1).unwrap();
    assert_eq!(fps.frame_to_secs(FrameIndex(0)), 0.0);
    assert!((fps.frame_to_secs(FrameIndex(50)) - 2.0).abs() < 1e-12);
}

#[test]
fn resolution_requires_even_sides() {
    assert!(Resolution::new(1280, 720).is_ok());
    assert!(Resolution::new(0, 720).is_err());
    assert!(Resolution::new(641, 360).is_err());
    assert_eq!(Resolution::new(640, 360).unwrap().ffmpeg_size(), "640x360");
}

#[test]
fn vec3_lerp_midpoint() {
    let a = Vec3::new(0.0, 2.0, -4.0);
    let b = Vec3::new(2.0, 4.0, 4.0);
    assert_eq!(a.lerp(b, 0.5), Vec3::new(1.0, 3.0, 0.0));
}

#[test]
fn clamp_time_bounds() {
    assert_eq!(clamp_time(-1.0, 10.0), 0.0);
    assert_eq!(clamp_time(12.0, 10.0), 10.0);
    assert_eq!(clamp_time(3.5, 10.0), 3.5);
}
