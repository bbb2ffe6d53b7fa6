use chrono::{DateTime, Utc};

use crate::analysis::AudioAnalysis;
use crate::animation::gesture::GestureData;
use crate::animation::lipsync::LipSyncData;
use crate::model::request::AvatarRenderRequest;

/// Opaque render-job identifier, `avatar_<uuid>`.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Fresh random id.
    pub fn generate() -> Self {
        Self(format!("avatar_{}", uuid::Uuid::new_v4().simple()))
    }

    /// Borrow as `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Lifecycle state of a render job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    /// Accepted, pipeline not started.
    Queued,
    /// Speech analysis running.
    Analyzing,
    /// Gesture synthesis running.
    Generating,
    /// Lip-sync synthesis running.
    LipSync,
    /// Frames being rendered, assembled or published.
    Rendering,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
}

impl JobStatus {
    /// `true` for `completed` and `failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Fixed progress checkpoint: status, percentage and stage text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    /// Status entered at this checkpoint.
    pub status: JobStatus,
    /// Progress percentage.
    pub progress: u8,
    /// Human-readable stage text.
    pub stage: &'static str,
}

impl Checkpoint {
    /// Initial state of every job.
    pub const QUEUED: Self = Self::new(JobStatus::Queued, 0, "Preparing avatar render...");
    /// Speech analysis.
    pub const ANALYZING: Self = Self::new(
        JobStatus::Analyzing,
        10,
        "Analyzing audio for synchronization...",
    );
    /// Lip-sync synthesis.
    pub const LIP_SYNC: Self = Self::new(JobStatus::LipSync, 30, "Generating lip-sync data...");
    /// Gesture synthesis.
    pub const GESTURES: Self = Self::new(
        JobStatus::Generating,
        50,
        "Generating gestures and movement...",
    );
    /// Frame rendering.
    pub const RENDERING: Self = Self::new(JobStatus::Rendering, 70, "Rendering avatar frames...");
    /// Video assembly.
    pub const ENCODING: Self = Self::new(JobStatus::Rendering, 85, "Encoding video...");
    /// Artifact upload.
    pub const PUBLISHING: Self = Self::new(JobStatus::Rendering, 95, "Publishing video...");
    /// Success.
    pub const COMPLETED: Self = Self::new(
        JobStatus::Completed,
        100,
        "Avatar rendered successfully!",
    );

    const fn new(status: JobStatus, progress: u8, stage: &'static str) -> Self {
        Self {
            status,
            progress,
            stage,
        }
    }
}

/// Stage text recorded on failure.
pub const FAILED_STAGE: &str = "Avatar render failed";

/// Full record of one render job.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderJob {
    /// Job id.
    pub id: JobId,
    /// Owning project.
    pub project_id: String,
    /// Slide the clip belongs to.
    pub slide_id: String,
    /// Lifecycle state.
    pub status: JobStatus,
    /// Progress percentage, 0-100.
    pub progress: u8,
    /// Stage text for display.
    pub current_stage: String,
    /// Public video URL once completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_url: Option<String>,
    /// Public thumbnail URL once completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Failure message once failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Speech analysis result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_analysis: Option<AudioAnalysis>,
    /// Lip-sync result, when enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lip_sync_data: Option<LipSyncData>,
    /// Gesture result, when enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gesture_data: Option<GestureData>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Time the job reached a terminal state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl RenderJob {
    /// New `queued` job for `request`.
    pub fn queued(id: JobId, request: &AvatarRenderRequest) -> Self {
        let cp = Checkpoint::QUEUED;
        Self {
            id,
            project_id: request.project_id.clone(),
            slide_id: request.slide_id.clone(),
            status: cp.status,
            progress: cp.progress,
            current_stage: cp.stage.to_string(),
            output_url: None,
            thumbnail_url: None,
            error_message: None,
            audio_analysis: None,
            lip_sync_data: None,
            gesture_data: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Move to a non-terminal checkpoint.
    ///
    /// Ignored once the job is terminal, and for checkpoints behind the current progress.
    pub fn advance(&mut self, cp: Checkpoint) {
        if self.status.is_terminal() || cp.status.is_terminal() || cp.progress < self.progress {
            return;
        }
        self.status = cp.status;
        self.progress = cp.progress;
        self.current_stage = cp.stage.to_string();
    }

    /// Mark completed with the published URLs.
    pub fn complete(&mut self, output_url: String, thumbnail_url: String) {
        if self.status.is_terminal() {
            return;
        }
        let cp = Checkpoint::COMPLETED;
        self.status = cp.status;
        self.progress = cp.progress;
        self.current_stage = cp.stage.to_string();
        self.output_url = Some(output_url);
        self.thumbnail_url = Some(thumbnail_url);
        self.completed_at = Some(Utc::now());
    }

    /// Mark failed with `message`. Progress stays where the failing stage left it.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.status = JobStatus::Failed;
        self.current_stage = FAILED_STAGE.to_string();
        self.error_message = Some(message.into());
        self.completed_at = Some(Utc::now());
    }

    /// Compact view returned from `submit`.
    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            id: self.id.clone(),
            status: self.status,
            progress: self.progress,
            current_stage: self.current_stage.clone(),
        }
    }
}

/// Status-only view of a job.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshot {
    /// Job id.
    pub id: JobId,
    /// Lifecycle state.
    pub status: JobStatus,
    /// Progress percentage.
    pub progress: u8,
    /// Stage text.
    pub current_stage: String,
}

#[cfg(test)]
#[path = "../../tests/unit/model/job.rs"]
mod tests;
