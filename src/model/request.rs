use crate::foundation::error::{AvatarError, AvatarResult};

/// Render quality tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Fast preview.
    Draft,
    /// Default delivery quality.
    Standard,
    /// Full HD.
    High,
    /// 4K.
    Ultra,
}

impl Quality {
    /// Every tier, lowest first.
    pub const ALL: [Quality; 4] = [Self::Draft, Self::Standard, Self::High, Self::Ultra];
}

/// Avatar appearance and behaviour knobs.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarConfig {
    /// Avatar model identifier.
    pub model: String,
    /// Base pose name.
    pub pose: String,
    /// Expression weight.
    pub expression: f64,
    /// How much the avatar gestures, 0-100.
    pub gesture_frequency: f64,
    /// Eye-contact level, 0-100; scales idle look-away movement.
    pub eye_contact: f64,
    /// Output quality tier.
    pub quality: Quality,
}

impl AvatarConfig {
    /// `gesture_frequency` as a `[0, 1]` factor.
    pub fn gesture_factor(&self) -> f64 {
        self.gesture_frequency / 100.0
    }

    /// `eye_contact` as a `[0, 1]` factor.
    pub fn eye_contact_factor(&self) -> f64 {
        self.eye_contact / 100.0
    }
}

/// A caller's request to render one avatar clip.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarRenderRequest {
    /// Owning project.
    pub project_id: String,
    /// Slide the clip belongs to.
    pub slide_id: String,
    /// Avatar settings.
    pub avatar_config: AvatarConfig,
    /// Reference audio track (URL or path); may be unreachable.
    pub audio_url: String,
    /// Transcript spoken in the audio.
    pub audio_text: String,
    /// Caller's duration estimate in seconds; informational only.
    #[serde(default)]
    pub duration: f64,
    /// Generate lip-sync curves.
    #[serde(default)]
    pub lip_sync_enabled: bool,
    /// Generate gestures.
    #[serde(default)]
    pub gesture_sync: bool,
}

impl AvatarRenderRequest {
    /// Reject requests that must never become jobs.
    pub fn validate(&self) -> AvatarResult<()> {
        require_non_empty("projectId", &self.project_id)?;
        require_non_empty("slideId", &self.slide_id)?;
        require_non_empty("audioUrl", &self.audio_url)?;
        require_non_empty("audioText", &self.audio_text)?;

        let cfg = &self.avatar_config;
        require_percent("avatarConfig.gestureFrequency", cfg.gesture_frequency)?;
        require_percent("avatarConfig.eyeContact", cfg.eye_contact)?;
        if !cfg.expression.is_finite() {
            return Err(AvatarError::validation(
                "avatarConfig.expression must be a finite number",
            ));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(AvatarError::validation(
                "duration must be a non-negative number",
            ));
        }
        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> AvatarResult<()> {
    if value.trim().is_empty() {
        return Err(AvatarError::validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_percent(field: &str, value: f64) -> AvatarResult<()> {
    if !(0.0..=100.0).contains(&value) {
        return Err(AvatarError::validation(format!(
            "{field} must be within [0, 100], got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/model/request.rs"]
mod tests;
