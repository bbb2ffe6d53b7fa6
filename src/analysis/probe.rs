use async_trait::async_trait;

use crate::foundation::error::{AvatarError, AvatarResult};

/// Basic metadata about a reference audio track.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioInfo {
    /// Length in seconds.
    pub duration_secs: f64,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

/// Capability that reads duration and sample rate from an audio source.
#[async_trait]
pub trait AudioProbe: Send + Sync {
    /// Probe `source` (URL or local path).
    async fn probe(&self, source: &str) -> AvatarResult<AudioInfo>;
}

/// [`AudioProbe`] backed by the system `ffprobe` binary.
#[derive(Clone, Debug)]
pub struct FfprobeAudioProbe {
    binary: String,
}

impl Default for FfprobeAudioProbe {
    fn default() -> Self {
        Self {
            binary: "ffprobe".to_string(),
        }
    }
}

impl FfprobeAudioProbe {
    /// Use a specific `ffprobe` executable.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl AudioProbe for FfprobeAudioProbe {
    async fn probe(&self, source: &str) -> AvatarResult<AudioInfo> {
        let out = tokio::process::Command::new(&self.binary)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-show_format",
            ])
            .arg(source)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| AvatarError::analysis(format!("failed to run ffprobe: {e}")))?;
        if !out.status.success() {
            return Err(AvatarError::analysis(format!(
                "ffprobe failed for '{source}': {}",
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        parse_ffprobe_json(&out.stdout)
    }
}

/// Extract [`AudioInfo`] from `ffprobe -print_format json` output.
pub fn parse_ffprobe_json(bytes: &[u8]) -> AvatarResult<AudioInfo> {
    // ffprobe prints numbers as strings.
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        sample_rate: Option<String>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let parsed: ProbeOut = serde_json::from_slice(bytes)
        .map_err(|e| AvatarError::analysis(format!("ffprobe json parse failed: {e}")))?;
    let audio = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"))
        .ok_or_else(|| AvatarError::analysis("no audio stream found"))?;

    let sample_rate = audio
        .sample_rate
        .as_deref()
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|&sr| sr > 0)
        .ok_or_else(|| AvatarError::analysis("missing audio sample_rate from ffprobe"))?;
    let duration_secs = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(audio.duration.as_deref())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| AvatarError::analysis("missing audio duration from ffprobe"))?;

    Ok(AudioInfo {
        duration_secs,
        sample_rate,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/probe.rs"]
mod tests;
