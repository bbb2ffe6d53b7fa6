use super::*;
use crate::model::request::{AvatarConfig, Quality};

fn job() -> RenderJob {
    let request = AvatarRenderRequest {
        project_id: "p1".to_string(),
        slide_id: "s1".to_string(),
        avatar_config: AvatarConfig {
            model: "anna".to_string(),
            pose: "standing".to_string(),
            expression: 0.0,
            gesture_frequency: 50.0,
            eye_contact: 50.0,
            quality: Quality::Draft,
        },
        audio_url: "missing.mp3".to_string(),
        audio_text: "Hi.".to_string(),
        duration: 0.0,
        lip_sync_enabled: false,
        gesture_sync: false,
    };
    RenderJob::queued(JobId::generate(), &request)
}

#[test]
fn ids_are_prefixed_and_unique() {
    let a = JobId::generate();
    let b = JobId::generate();
    assert!(a.as_str().starts_with("avatar_"));
    assert_eq!(a.as_str().len(), "avatar_".len() + 32);
    assert_ne!(a, b);
    assert_eq!(a.to_string(), a.as_str());
}

#[test]
fn new_jobs_are_queued() {
    let j = job();
    assert_eq!(j.status, JobStatus::Queued);
    assert_eq!(j.progress, 0);
    assert_eq!(j.slide_id, "s1");
    assert!(j.completed_at.is_none());
}

#[test]
fn progress_never_decreases() {
    let mut j = job();
    j.advance(Checkpoint::GESTURES);
    j.advance(Checkpoint::ANALYZING);
    assert_eq!(j.progress, 50);
    assert_eq!(j.status, JobStatus::Generating);
}

#[test]
fn terminal_states_are_sticky() {
    let mut j = job();
    j.advance(Checkpoint::RENDERING);
    j.fail("boom");
    assert_eq!(j.status, JobStatus::Failed);
    assert_eq!(j.progress, 70);
    assert_eq!(j.current_stage, FAILED_STAGE);
    assert_eq!(j.error_message.as_deref(), Some("boom"));
    assert!(j.completed_at.is_some());

    j.advance(Checkpoint::PUBLISHING);
    j.complete("v".to_string(), "t".to_string());
    j.fail("again");
    assert_eq!(j.status, JobStatus::Failed);
    assert_eq!(j.error_message.as_deref(), Some("boom"));
    assert!(j.output_url.is_none());
}

#[test]
fn complete_records_urls() {
    let mut j = job();
    j.complete("https://cdn/v.mp4".to_string(), "https://cdn/t.png".to_string());
    assert_eq!(j.status, JobStatus::Completed);
    assert_eq!(j.progress, 100);
    assert_eq!(j.output_url.as_deref(), Some("https://cdn/v.mp4"));
    assert_eq!(j.thumbnail_url.as_deref(), Some("https://cdn/t.png"));
}

#[test]
fn status_serializes_kebab_case() {
    assert_eq!(
        serde_json::to_string(&JobStatus::LipSync).unwrap(),
        "\"lip-sync\""
    );
    let snap = job().snapshot();
    let v = serde_json::to_value(&snap).unwrap();
    assert_eq!(v["status"], "queued");
    assert_eq!(v["progress"], 0);
    assert!(v["currentStage"].is_string());
    assert!(v["id"].as_str().unwrap().starts_with("avatar_"));
}

#[test]
fn checkpoints_are_increasing() {
    let order = [
        Checkpoint::QUEUED,
        Checkpoint::ANALYZING,
        Checkpoint::LIP_SYNC,
        Checkpoint::GESTURES,
        Checkpoint::RENDERING,
        Checkpoint::ENCODING,
        Checkpoint::PUBLISHING,
        Checkpoint::COMPLETED,
    ];
    for w in order.windows(2) {
        assert!(w[0].progress < w[1].progress);
    }
}
