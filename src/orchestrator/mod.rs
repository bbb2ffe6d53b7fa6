//! Render-job lifecycle: submission, background execution and status queries.
//!
//! [`JobOrchestrator::submit`] validates a request, records a `queued` job and spawns its
//! pipeline as an independent tokio task. The task is the only writer of its job record; it
//! saves a copy to the [`JobStore`] at every checkpoint and once more at the terminal state.
//! Any stage error fails the job, and so does a panic inside a capability; there are no retries.

use std::sync::Arc;

use crate::analysis::probe::FfprobeAudioProbe;
use crate::analysis::{AudioAnalysis, HeuristicAnalyzer, SpeechAnalyzer};
use crate::animation::gesture::GestureData;
use crate::animation::lipsync::LipSyncData;
use crate::encode::ffmpeg::{FfmpegAssembler, VideoAssembler};
use crate::foundation::config::RenderConfig;
use crate::foundation::error::{AvatarError, AvatarResult};
use crate::model::job::{Checkpoint, JobId, JobSnapshot, RenderJob};
use crate::model::request::AvatarRenderRequest;
use crate::pipeline::{FramePlan, PublishedUrls, RenderPipeline};
use crate::publish::StoragePublisher;
use crate::render::frame::{FrameRenderer, SilhouetteRenderer};

mod store;

pub use store::{InMemoryJobStore, JobStore};

/// External collaborators of the orchestrator.
#[derive(Clone)]
pub struct Capabilities {
    /// Speech analysis.
    pub analyzer: Arc<dyn SpeechAnalyzer>,
    /// Frame rasterizer.
    pub renderer: Arc<dyn FrameRenderer>,
    /// Frames-to-video assembler.
    pub assembler: Arc<dyn VideoAssembler>,
    /// Artifact storage.
    pub publisher: Arc<dyn StoragePublisher>,
    /// Job registry.
    pub store: Arc<dyn JobStore>,
}

impl Capabilities {
    /// ffprobe analysis, silhouette frames, ffmpeg assembly and an in-memory store, publishing
    /// through `publisher`.
    pub fn with_defaults(cfg: &RenderConfig, publisher: Arc<dyn StoragePublisher>) -> Self {
        Self {
            analyzer: Arc::new(HeuristicAnalyzer::from_config(
                Arc::new(FfprobeAudioProbe::default()),
                cfg,
            )),
            renderer: Arc::new(SilhouetteRenderer::default()),
            assembler: Arc::new(FfmpegAssembler::default()),
            publisher,
            store: Arc::new(InMemoryJobStore::new()),
        }
    }
}

struct Inner {
    cfg: Arc<RenderConfig>,
    analyzer: Arc<dyn SpeechAnalyzer>,
    pipeline: RenderPipeline,
    store: Arc<dyn JobStore>,
}

/// Accepts render requests and runs each as a background job. Cheap to clone.
#[derive(Clone)]
pub struct JobOrchestrator {
    inner: Arc<Inner>,
}

impl JobOrchestrator {
    /// Orchestrator over `caps`. `cfg` is validated here.
    pub fn new(cfg: RenderConfig, caps: Capabilities) -> AvatarResult<Self> {
        cfg.validate()?;
        let cfg = Arc::new(cfg);
        let pipeline = RenderPipeline::new(
            Arc::clone(&cfg),
            caps.renderer,
            caps.assembler,
            caps.publisher,
        );
        Ok(Self {
            inner: Arc::new(Inner {
                cfg,
                analyzer: caps.analyzer,
                pipeline,
                store: caps.store,
            }),
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &RenderConfig {
        &self.inner.cfg
    }

    /// Validate `request`, record a `queued` job and start it in the background.
    ///
    /// Must be called within a tokio runtime. Returns without waiting for any stage; invalid
    /// requests are rejected without creating a job.
    pub async fn submit(&self, request: AvatarRenderRequest) -> AvatarResult<JobSnapshot> {
        request.validate()?;

        let job = RenderJob::queued(JobId::generate(), &request);
        let snapshot = job.snapshot();
        self.inner.store.insert(job.clone()).await?;
        tracing::info!(
            job_id = %job.id,
            project_id = %request.project_id,
            slide_id = %request.slide_id,
            "avatar render queued"
        );

        tokio::spawn(self.clone().supervise(job, request));
        Ok(snapshot)
    }

    /// Current record of `id`.
    pub async fn get(&self, id: &JobId) -> AvatarResult<Option<RenderJob>> {
        self.inner.store.get(id).await
    }

    /// Poll `id` at the configured interval until it is `completed` or `failed`.
    pub async fn wait_until_terminal(&self, id: &JobId) -> AvatarResult<RenderJob> {
        let every = self.inner.cfg.poll_interval();
        loop {
            match self.get(id).await? {
                Some(job) if job.status.is_terminal() => return Ok(job),
                Some(_) => tokio::time::sleep(every).await,
                None => return Err(AvatarError::storage(format!("job '{id}' not found"))),
            }
        }
    }

    /// Runs [`Self::drive`] on its own task and fails the stored job if that task panics.
    async fn supervise(self, job: RenderJob, request: AvatarRenderRequest) {
        let id = job.id.clone();
        let Err(e) = tokio::spawn(self.clone().drive(job, request)).await else {
            return;
        };
        let reason = match e.try_into_panic() {
            Ok(payload) => match payload.downcast::<String>() {
                Ok(msg) => *msg,
                Err(payload) => payload
                    .downcast_ref::<&str>()
                    .map_or_else(|| "unknown panic".to_string(), |s| s.to_string()),
            },
            Err(e) => e.to_string(),
        };
        tracing::error!(job_id = %id, reason = %reason, "avatar render task panicked");

        let mut job = match self.inner.store.get(&id).await {
            Ok(Some(job)) if !job.status.is_terminal() => job,
            Ok(_) => return,
            Err(e) => {
                tracing::error!(job_id = %id, error = %e, "failed to load panicked job");
                return;
            }
        };
        job.fail(format!("render task panicked: {reason}"));
        if let Err(e) = self.inner.store.put(job).await {
            tracing::error!(job_id = %id, error = %e, "failed to save terminal job state");
        }
    }

    async fn drive(self, mut job: RenderJob, request: AvatarRenderRequest) {
        match self.run(&mut job, &request).await {
            Ok(urls) => {
                job.complete(urls.video_url, urls.thumbnail_url);
                tracing::info!(
                    job_id = %job.id,
                    output_url = job.output_url.as_deref().unwrap_or_default(),
                    "avatar render completed"
                );
            }
            Err(e) => {
                tracing::error!(job_id = %job.id, error = %e, "avatar render failed");
                job.fail(e.detail());
            }
        }

        let id = job.id.clone();
        if let Err(e) = self.inner.store.put(job).await {
            tracing::error!(job_id = %id, error = %e, "failed to save terminal job state");
        }
    }

    #[tracing::instrument(skip_all, fields(job_id = %job.id, slide_id = %request.slide_id))]
    async fn run(
        &self,
        job: &mut RenderJob,
        request: &AvatarRenderRequest,
    ) -> AvatarResult<PublishedUrls> {
        let cfg = &self.inner.cfg;

        self.checkpoint(job, Checkpoint::ANALYZING).await?;
        let analysis = self
            .inner
            .analyzer
            .analyze(&request.audio_url, &request.audio_text)
            .await?;
        tracing::debug!(
            duration = analysis.duration,
            phonemes = analysis.phonemes.len(),
            emotions = analysis.emotions.len(),
            pauses = analysis.pause_points.len(),
            "speech analyzed"
        );
        job.audio_analysis = Some(analysis.clone());

        if request.lip_sync_enabled {
            self.checkpoint(job, Checkpoint::LIP_SYNC).await?;
            job.lip_sync_data = Some(LipSyncData::from_analysis(&analysis));
        }

        if request.gesture_sync {
            self.checkpoint(job, Checkpoint::GESTURES).await?;
            let gestures =
                GestureData::generate(&analysis, &request.avatar_config, &cfg.gestures);
            tracing::debug!(gestures = gestures.gestures.len(), "gestures generated");
            job.gesture_data = Some(gestures);
        }

        self.checkpoint(job, Checkpoint::RENDERING).await?;
        let scratch = self.inner.pipeline.scratch_dir()?;
        let result = self
            .render_in(job, request, &analysis, scratch.path())
            .await;
        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            tracing::warn!(
                path = %scratch_path.display(),
                error = %e,
                "failed to remove scratch directory"
            );
        }
        result
    }

    async fn render_in(
        &self,
        job: &mut RenderJob,
        request: &AvatarRenderRequest,
        analysis: &AudioAnalysis,
        dir: &std::path::Path,
    ) -> AvatarResult<PublishedUrls> {
        let cfg = &self.inner.cfg;
        let pipeline = &self.inner.pipeline;

        let plan = FramePlan {
            avatar: request.avatar_config.clone(),
            duration_secs: analysis.duration,
            lip_sync: job.lip_sync_data.clone(),
            gestures: job.gesture_data.clone(),
        };
        let frames = pipeline.render_frames(dir, plan).await?;
        tracing::debug!(frames, "frames rendered");

        self.checkpoint(job, Checkpoint::ENCODING).await?;
        let profile = cfg.quality.profile(request.avatar_config.quality);
        let video = pipeline
            .assemble(dir, cfg.fps, profile, analysis.audio_source.clone())
            .await?;

        self.checkpoint(job, Checkpoint::PUBLISHING).await?;
        pipeline
            .publish(&video, dir, &request.slide_id, &job.id)
            .await
    }

    async fn checkpoint(&self, job: &mut RenderJob, cp: Checkpoint) -> AvatarResult<()> {
        job.advance(cp);
        tracing::info!(
            status = ?job.status,
            progress = job.progress,
            stage = %job.current_stage,
            "checkpoint"
        );
        self.inner.store.put(job.clone()).await
    }
}
