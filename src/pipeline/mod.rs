//! Rendering, assembly and publishing of one avatar clip.
//!
//! Each step is a separate call so the orchestrator can record a checkpoint between them. The
//! scratch directory returned by [`RenderPipeline::scratch_dir`] is removed when dropped, on
//! success and failure alike.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use tempfile::TempDir;

use crate::animation::gesture::GestureData;
use crate::animation::lipsync::LipSyncData;
use crate::encode::ffmpeg::{AssemblyJob, VideoAssembler};
use crate::foundation::config::{QualityProfile, RenderConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{AvatarError, AvatarResult};
use crate::model::job::JobId;
use crate::model::request::AvatarConfig;
use crate::publish::StoragePublisher;
use crate::render::frame::{FRAME_PATTERN, FrameRenderer, FrameRequest, frame_file_name, write_png};

/// Container file written into the scratch directory.
pub const VIDEO_FILE_NAME: &str = "avatar.mp4";

/// Storage key of the published video.
pub fn video_key(slide_id: &str, job_id: &JobId) -> String {
    format!("avatars/avatar_{}_{job_id}.mp4", key_component(slide_id))
}

/// Storage key of the published thumbnail.
pub fn thumbnail_key(slide_id: &str, job_id: &JobId) -> String {
    format!("avatars/avatar_{}_{job_id}_thumb.png", key_component(slide_id))
}

/// `slide_id` with everything outside `[A-Za-z0-9_-]` replaced by `_`.
fn key_component(slide_id: &str) -> String {
    slide_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Owned inputs for the frame loop.
#[derive(Clone, Debug)]
pub struct FramePlan {
    /// Avatar settings.
    pub avatar: AvatarConfig,
    /// Clip length in seconds.
    pub duration_secs: f64,
    /// Lip-sync track, when generated.
    pub lip_sync: Option<LipSyncData>,
    /// Gesture track, when generated.
    pub gestures: Option<GestureData>,
}

/// Public URLs of a published clip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishedUrls {
    /// Video URL.
    pub video_url: String,
    /// Thumbnail URL; the video URL when the thumbnail could not be published.
    pub thumbnail_url: String,
}

/// Render/assemble/publish steps wired to their capabilities.
#[derive(Clone)]
pub struct RenderPipeline {
    cfg: Arc<RenderConfig>,
    renderer: Arc<dyn FrameRenderer>,
    assembler: Arc<dyn VideoAssembler>,
    publisher: Arc<dyn StoragePublisher>,
}

impl RenderPipeline {
    /// Pipeline over the given capabilities.
    pub fn new(
        cfg: Arc<RenderConfig>,
        renderer: Arc<dyn FrameRenderer>,
        assembler: Arc<dyn VideoAssembler>,
        publisher: Arc<dyn StoragePublisher>,
    ) -> Self {
        Self {
            cfg,
            renderer,
            assembler,
            publisher,
        }
    }

    /// Configuration the pipeline renders with.
    pub fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    /// Fresh per-job scratch directory under the configured work root.
    pub fn scratch_dir(&self) -> AvatarResult<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("avatar-render-");
        let dir = match &self.cfg.work_root {
            Some(root) => {
                std::fs::create_dir_all(root)
                    .with_context(|| format!("create work root '{}'", root.display()))?;
                builder
                    .tempdir_in(root)
                    .with_context(|| format!("create scratch dir in '{}'", root.display()))?
            }
            None => builder.tempdir().context("create scratch dir")?,
        };
        Ok(dir)
    }

    /// Render `ceil(duration * fps)` frames into `dir` on a blocking worker; returns the count.
    pub async fn render_frames(&self, dir: &Path, plan: FramePlan) -> AvatarResult<u64> {
        let fps = self.cfg.fps;
        let resolution = self.cfg.quality.profile(plan.avatar.quality).resolution;
        let total = fps.secs_to_frames_ceil(plan.duration_secs);
        if total == 0 {
            return Err(AvatarError::render(format!(
                "clip duration {}s yields no frames",
                plan.duration_secs
            )));
        }

        let renderer = Arc::clone(&self.renderer);
        let dir = dir.to_path_buf();
        tokio::task::spawn_blocking(move || -> AvatarResult<u64> {
            for i in 0..total {
                let frame = FrameIndex(i);
                let req = FrameRequest {
                    avatar: &plan.avatar,
                    frame,
                    fps,
                    resolution,
                    lip_sync: plan.lip_sync.as_ref(),
                    gestures: plan.gestures.as_ref(),
                };
                let rgba = renderer.render(&req)?;
                if (rgba.width, rgba.height) != (resolution.width, resolution.height) {
                    return Err(AvatarError::render(format!(
                        "renderer returned {}x{} for frame {i}, expected {}",
                        rgba.width,
                        rgba.height,
                        resolution.ffmpeg_size()
                    )));
                }
                write_png(&rgba, &dir.join(frame_file_name(frame)))?;
            }
            Ok(total)
        })
        .await
        .map_err(|e| AvatarError::render(format!("frame worker failed: {e}")))?
    }

    /// Assemble the frames in `dir` into [`VIDEO_FILE_NAME`]; an unsuccessful outcome becomes an
    /// [`AvatarError::Assembly`] carrying the assembler's message.
    pub async fn assemble(
        &self,
        dir: &Path,
        fps: Fps,
        profile: QualityProfile,
        audio: Option<String>,
    ) -> AvatarResult<PathBuf> {
        let job = AssemblyJob {
            frames_dir: dir.to_path_buf(),
            pattern: FRAME_PATTERN.to_string(),
            fps,
            resolution: profile.resolution,
            codec: self.cfg.codec.clone(),
            crf: profile.crf,
            audio,
            output_path: dir.join(VIDEO_FILE_NAME),
        };
        let outcome = self.assembler.assemble(&job).await;
        if !outcome.success {
            return Err(AvatarError::assembly(
                outcome
                    .error
                    .unwrap_or_else(|| "video assembly failed".to_string()),
            ));
        }
        Ok(outcome.output_path.unwrap_or(job.output_path))
    }

    /// Upload the video and the first frame as its thumbnail.
    ///
    /// A thumbnail failure is logged and the video URL reused.
    pub async fn publish(
        &self,
        video: &Path,
        frames_dir: &Path,
        slide_id: &str,
        job_id: &JobId,
    ) -> AvatarResult<PublishedUrls> {
        let bytes = tokio::fs::read(video)
            .await
            .with_context(|| format!("read assembled video '{}'", video.display()))?;
        let video_url = self
            .publisher
            .publish(&video_key(slide_id, job_id), bytes, "video/mp4")
            .await?;

        let first = frames_dir.join(frame_file_name(FrameIndex(0)));
        let thumb = async {
            let bytes = tokio::fs::read(&first)
                .await
                .with_context(|| format!("read thumbnail frame '{}'", first.display()))?;
            self.publisher
                .publish(&thumbnail_key(slide_id, job_id), bytes, "image/png")
                .await
        };
        let thumbnail_url = match thumb.await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(%job_id, error = %e, "thumbnail upload failed, reusing video url");
                video_url.clone()
            }
        };

        Ok(PublishedUrls {
            video_url,
            thumbnail_url,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/mod.rs"]
mod tests;
