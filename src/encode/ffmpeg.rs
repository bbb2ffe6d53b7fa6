use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::foundation::core::{Fps, Resolution};

/// Inputs of one frames-to-video assembly.
#[derive(Clone, Debug, PartialEq)]
pub struct AssemblyJob {
    /// Directory holding the numbered frames.
    pub frames_dir: PathBuf,
    /// printf-style frame file pattern inside `frames_dir`.
    pub pattern: String,
    /// Frame rate of the sequence.
    pub fps: Fps,
    /// Output frame size.
    pub resolution: Resolution,
    /// Video codec name.
    pub codec: String,
    /// Constant rate factor.
    pub crf: u8,
    /// Optional audio track muxed into the output.
    pub audio: Option<String>,
    /// Container path to write.
    pub output_path: PathBuf,
}

/// Result reported by a [`VideoAssembler`]. Failures are data, not errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssemblyOutcome {
    /// Whether the container was written.
    pub success: bool,
    /// Written container, when successful.
    pub output_path: Option<PathBuf>,
    /// Failure message, when unsuccessful.
    pub error: Option<String>,
}

impl AssemblyOutcome {
    /// Successful outcome.
    pub fn ok(output_path: impl Into<PathBuf>) -> Self {
        Self {
            success: true,
            output_path: Some(output_path.into()),
            error: None,
        }
    }

    /// Failed outcome carrying `error`.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output_path: None,
            error: Some(error.into()),
        }
    }
}

/// Capability that turns a numbered frame sequence (plus optional audio) into a container file.
#[async_trait]
pub trait VideoAssembler: Send + Sync {
    /// Assemble `job`.
    async fn assemble(&self, job: &AssemblyJob) -> AssemblyOutcome;
}

/// [`VideoAssembler`] backed by the system `ffmpeg` binary.
#[derive(Clone, Debug)]
pub struct FfmpegAssembler {
    binary: String,
}

impl Default for FfmpegAssembler {
    fn default() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
        }
    }
}

impl FfmpegAssembler {
    /// Use a specific `ffmpeg` executable.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Command-line arguments for `job`, without the binary.
    pub fn command_args(job: &AssemblyJob) -> Vec<String> {
        let input = job.frames_dir.join(&job.pattern);
        let mut args: Vec<String> = vec![
            "-y".into(),
            "-loglevel".into(),
            "error".into(),
            "-framerate".into(),
            format!("{}/{}", job.fps.num, job.fps.den),
            "-i".into(),
            path_arg(&input),
        ];
        if let Some(audio) = &job.audio {
            args.extend(["-i".into(), audio.clone()]);
        }
        args.extend([
            "-c:v".into(),
            job.codec.clone(),
            "-crf".into(),
            job.crf.to_string(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            "-s".into(),
            job.resolution.ffmpeg_size(),
            "-movflags".into(),
            "+faststart".into(),
        ]);
        if job.audio.is_some() {
            args.extend(["-c:a".into(), "aac".into(), "-shortest".into()]);
        } else {
            args.push("-an".into());
        }
        args.push(path_arg(&job.output_path));
        args
    }
}

fn path_arg(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}

#[async_trait]
impl VideoAssembler for FfmpegAssembler {
    async fn assemble(&self, job: &AssemblyJob) -> AssemblyOutcome {
        if let Err(e) = job.resolution.validate() {
            return AssemblyOutcome::failed(e.detail());
        }
        if let Some(parent) = job.output_path.parent()
            && let Err(e) = tokio::fs::create_dir_all(parent).await
        {
            return AssemblyOutcome::failed(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ));
        }

        let args = Self::command_args(job);
        tracing::debug!(binary = %self.binary, ?args, "running ffmpeg");
        let out = match tokio::process::Command::new(&self.binary)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
        {
            Ok(out) => out,
            Err(e) => {
                return AssemblyOutcome::failed(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ));
            }
        };

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return AssemblyOutcome::failed(format!(
                "ffmpeg exited with status {}: {}",
                out.status,
                stderr.trim()
            ));
        }
        AssemblyOutcome::ok(job.output_path.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
