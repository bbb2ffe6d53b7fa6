use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use super::*;
use crate::encode::ffmpeg::AssemblyOutcome;
use crate::foundation::core::Resolution;
use crate::model::request::Quality;
use crate::publish::LocalPublisher;
use crate::render::frame::FrameRGBA;

#[derive(Default)]
struct CountingRenderer {
    calls: AtomicU64,
}

impl FrameRenderer for CountingRenderer {
    fn render(&self, req: &FrameRequest<'_>) -> AvatarResult<FrameRGBA> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Resolution { width, height } = req.resolution;
        Ok(FrameRGBA {
            width,
            height,
            data: vec![200; (width * height * 4) as usize],
        })
    }
}

struct ScriptedAssembler {
    outcome: Option<AssemblyOutcome>,
    seen: Mutex<Vec<AssemblyJob>>,
}

#[async_trait]
impl VideoAssembler for ScriptedAssembler {
    async fn assemble(&self, job: &AssemblyJob) -> AssemblyOutcome {
        self.seen.lock().unwrap().push(job.clone());
        match &self.outcome {
            Some(o) => o.clone(),
            None => {
                std::fs::write(&job.output_path, b"fake mp4").unwrap();
                AssemblyOutcome::ok(job.output_path.clone())
            }
        }
    }
}

struct RejectPng(LocalPublisher);

#[async_trait]
impl StoragePublisher for RejectPng {
    async fn publish(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AvatarResult<String> {
        if content_type == "image/png" {
            return Err(AvatarError::publish("thumbnails disabled"));
        }
        self.0.publish(key, bytes, content_type).await
    }
}

fn tiny_config(work_root: &Path) -> RenderConfig {
    let mut cfg = RenderConfig {
        fps: Fps { num: 10, den: 1 },
        work_root: Some(work_root.to_path_buf()),
        ..RenderConfig::default()
    };
    cfg.quality.draft.resolution = Resolution {
        width: 16,
        height: 8,
    };
    cfg
}

fn plan(duration_secs: f64) -> FramePlan {
    FramePlan {
        avatar: AvatarConfig {
            model: "anna".to_string(),
            pose: "standing".to_string(),
            expression: 0.0,
            gesture_frequency: 50.0,
            eye_contact: 50.0,
            quality: Quality::Draft,
        },
        duration_secs,
        lip_sync: None,
        gestures: None,
    }
}

fn pipeline(
    cfg: RenderConfig,
    renderer: Arc<CountingRenderer>,
    outcome: Option<AssemblyOutcome>,
    publisher: Arc<dyn StoragePublisher>,
) -> (RenderPipeline, Arc<ScriptedAssembler>) {
    let assembler = Arc::new(ScriptedAssembler {
        outcome,
        seen: Mutex::new(Vec::new()),
    });
    let p = RenderPipeline::new(Arc::new(cfg), renderer, assembler.clone(), publisher);
    (p, assembler)
}

#[test]
fn storage_keys() {
    let id = JobId::from("avatar_abc");
    assert_eq!(video_key("s1", &id), "avatars/avatar_s1_avatar_abc.mp4");
    assert_eq!(
        thumbnail_key("s1", &id),
        "avatars/avatar_s1_avatar_abc_thumb.png"
    );
}

#[test]
fn storage_keys_escape_slide_ids() {
    let id = JobId::from("avatar_abc");
    for slide in ["intro\\part2", "a/../b", "a//b", "é .x"] {
        let key = video_key(slide, &id);
        crate::publish::validate_key(&key).unwrap();
        crate::publish::validate_key(&thumbnail_key(slide, &id)).unwrap();
        assert_eq!(key.matches('/').count(), 1, "{key}");
    }
    assert_eq!(
        video_key("intro\\part2", &id),
        "avatars/avatar_intro_part2_avatar_abc.mp4"
    );
}

#[test]
fn scratch_dir_lives_under_work_root_and_is_removed_on_drop() {
    let root = tempfile::tempdir().unwrap();
    let work = root.path().join("work");
    let out = tempfile::tempdir().unwrap();
    let (p, _) = pipeline(
        tiny_config(&work),
        Arc::default(),
        None,
        Arc::new(LocalPublisher::file_urls(out.path()).unwrap()),
    );
    let dir = p.scratch_dir().unwrap();
    let path = dir.path().to_path_buf();
    assert!(path.starts_with(&work));
    assert!(path.is_dir());
    drop(dir);
    assert!(!path.exists());
}

#[tokio::test]
async fn renders_ceil_duration_times_fps_frames() {
    let root = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let renderer = Arc::new(CountingRenderer::default());
    let (p, _) = pipeline(
        tiny_config(root.path()),
        renderer.clone(),
        None,
        Arc::new(LocalPublisher::file_urls(out.path()).unwrap()),
    );
    let dir = p.scratch_dir().unwrap();
    let n = p.render_frames(dir.path(), plan(1.05)).await.unwrap();
    assert_eq!(n, 11);
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 11);
    assert!(dir.path().join("frame_000000.png").is_file());
    assert!(dir.path().join("frame_000010.png").is_file());
    assert!(!dir.path().join("frame_000011.png").exists());
}

#[tokio::test]
async fn zero_duration_is_a_render_error() {
    let root = tempfile::tempdir().unwrap();
    let (p, _) = pipeline(
        tiny_config(root.path()),
        Arc::default(),
        None,
        Arc::new(LocalPublisher::file_urls(root.path()).unwrap()),
    );
    let err = p.render_frames(root.path(), plan(0.0)).await.unwrap_err();
    assert!(matches!(err, AvatarError::Render(_)));
}

#[tokio::test]
async fn failed_assembly_carries_message() {
    let root = tempfile::tempdir().unwrap();
    let cfg = tiny_config(root.path());
    let profile = cfg.quality.profile(Quality::Draft);
    let (p, assembler) = pipeline(
        cfg,
        Arc::default(),
        Some(AssemblyOutcome::failed("encoder exploded")),
        Arc::new(LocalPublisher::file_urls(root.path()).unwrap()),
    );
    let err = p
        .assemble(root.path(), Fps { num: 10, den: 1 }, profile, Some("a.mp3".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, AvatarError::Assembly(_)));
    assert_eq!(err.detail(), "encoder exploded");

    let seen = assembler.seen.lock().unwrap();
    assert_eq!(seen[0].pattern, "frame_%06d.png");
    assert_eq!(seen[0].crf, profile.crf);
    assert_eq!(seen[0].audio.as_deref(), Some("a.mp3"));
}

#[tokio::test]
async fn thumbnail_failure_reuses_video_url() {
    let root = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let publisher = Arc::new(RejectPng(
        LocalPublisher::new(out.path(), "https://cdn.test").unwrap(),
    ));
    let (p, _) = pipeline(tiny_config(root.path()), Arc::default(), None, publisher);
    let dir = p.scratch_dir().unwrap();
    p.render_frames(dir.path(), plan(0.2)).await.unwrap();
    let video = p
        .assemble(
            dir.path(),
            Fps { num: 10, den: 1 },
            p.config().quality.profile(Quality::Draft),
            None,
        )
        .await
        .unwrap();

    let id = JobId::from("avatar_x");
    let urls = p.publish(&video, dir.path(), "s1", &id).await.unwrap();
    assert_eq!(urls.video_url, "https://cdn.test/avatars/avatar_s1_avatar_x.mp4");
    assert_eq!(urls.thumbnail_url, urls.video_url);
}

#[tokio::test]
async fn publishes_video_and_first_frame() {
    let root = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let publisher = Arc::new(LocalPublisher::new(out.path(), "https://cdn.test").unwrap());
    let (p, _) = pipeline(tiny_config(root.path()), Arc::default(), None, publisher);
    let dir = p.scratch_dir().unwrap();
    p.render_frames(dir.path(), plan(0.1)).await.unwrap();
    let video = p
        .assemble(
            dir.path(),
            Fps { num: 10, den: 1 },
            p.config().quality.profile(Quality::Draft),
            None,
        )
        .await
        .unwrap();

    let id = JobId::from("avatar_y");
    let urls = p.publish(&video, dir.path(), "s2", &id).await.unwrap();
    assert_eq!(
        urls.thumbnail_url,
        "https://cdn.test/avatars/avatar_s2_avatar_y_thumb.png"
    );
    let thumb = out.path().join("avatars/avatar_s2_avatar_y_thumb.png");
    assert_eq!(
        std::fs::read(thumb).unwrap(),
        std::fs::read(dir.path().join("frame_000000.png")).unwrap()
    );
}
