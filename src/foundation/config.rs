use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::core::{Fps, Resolution};
use crate::foundation::error::{AvatarError, AvatarResult};
use crate::model::request::Quality;

/// Encoder settings selected by a [`Quality`] tier.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QualityProfile {
    /// Output frame size.
    pub resolution: Resolution,
    /// x264-style constant rate factor; lower is better.
    pub crf: u8,
}

/// Per-tier encoder settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QualityTable {
    /// Settings for [`Quality::Draft`].
    pub draft: QualityProfile,
    /// Settings for [`Quality::Standard`].
    pub standard: QualityProfile,
    /// Settings for [`Quality::High`].
    pub high: QualityProfile,
    /// Settings for [`Quality::Ultra`].
    pub ultra: QualityProfile,
}

impl QualityTable {
    /// Look up the profile for `quality`.
    pub fn profile(&self, quality: Quality) -> QualityProfile {
        match quality {
            Quality::Draft => self.draft,
            Quality::Standard => self.standard,
            Quality::High => self.high,
            Quality::Ultra => self.ultra,
        }
    }
}

impl Default for QualityTable {
    fn default() -> Self {
        let p = |width, height, crf| QualityProfile {
            resolution: Resolution { width, height },
            crf,
        };
        Self {
            draft: p(640, 360, 32),
            standard: p(1280, 720, 23),
            high: p(1920, 1080, 18),
            ultra: p(3840, 2160, 14),
        }
    }
}

/// Tunables for gesture synthesis.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    /// Seconds between idle head movements.
    pub idle_interval_secs: f64,
    /// Length of each idle head movement.
    pub idle_duration_secs: f64,
    /// Length of the nod played at each pause.
    pub pause_reaction_secs: f64,
    /// Fixed intensity of pause reactions.
    pub pause_reaction_intensity: f64,
    /// Seed for the idle look-away magnitudes; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            idle_interval_secs: 3.0,
            idle_duration_secs: 1.0,
            pause_reaction_secs: 0.5,
            pause_reaction_intensity: 0.3,
            seed: None,
        }
    }
}

/// Runtime configuration for the render pipeline and orchestrator.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Target output frame rate.
    pub fps: Fps,
    /// Video codec passed to the assembler.
    pub codec: String,
    /// Resolution/CRF per quality tier.
    pub quality: QualityTable,
    /// Parent directory for per-job scratch directories; the OS temp dir when unset.
    pub work_root: Option<PathBuf>,
    /// Duration used when the audio probe fails.
    pub fallback_duration_secs: f64,
    /// Sample rate used when the audio probe fails.
    pub fallback_sample_rate: u32,
    /// Gesture synthesis tunables.
    pub gestures: GestureSettings,
    /// Poll interval used by [`crate::JobOrchestrator::wait_until_terminal`].
    pub poll_interval_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: Fps { num: 30, den: 1 },
            codec: "libx264".to_string(),
            quality: QualityTable::default(),
            work_root: None,
            fallback_duration_secs: 60.0,
            fallback_sample_rate: 44_100,
            gestures: GestureSettings::default(),
            poll_interval_ms: 250,
        }
    }
}

impl RenderConfig {
    /// Load and validate a JSON config file.
    pub fn from_path(path: &Path) -> AvatarResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .map_err(|e| AvatarError::validation(format!("config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> AvatarResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;
        if self.codec.trim().is_empty() {
            return Err(AvatarError::validation("codec must be non-empty"));
        }
        for q in Quality::ALL {
            self.quality.profile(q).resolution.validate()?;
        }
        if !(self.fallback_duration_secs.is_finite() && self.fallback_duration_secs > 0.0) {
            return Err(AvatarError::validation(
                "fallback_duration_secs must be a positive number",
            ));
        }
        if self.fallback_sample_rate == 0 {
            return Err(AvatarError::validation(
                "fallback_sample_rate must be non-zero",
            ));
        }
        let g = &self.gestures;
        if !(g.idle_interval_secs.is_finite() && g.idle_interval_secs > 0.0) {
            return Err(AvatarError::validation(
                "gestures.idle_interval_secs must be a positive number",
            ));
        }
        if !(g.idle_duration_secs.is_finite() && g.idle_duration_secs > 0.0) {
            return Err(AvatarError::validation(
                "gestures.idle_duration_secs must be a positive number",
            ));
        }
        if !(g.pause_reaction_secs.is_finite() && g.pause_reaction_secs > 0.0) {
            return Err(AvatarError::validation(
                "gestures.pause_reaction_secs must be a positive number",
            ));
        }
        if !(0.0..=1.0).contains(&g.pause_reaction_intensity) {
            return Err(AvatarError::validation(
                "gestures.pause_reaction_intensity must be within [0, 1]",
            ));
        }
        Ok(())
    }

    /// Poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
