//! Speech analysis: phoneme, emotion and pause timelines derived from the transcript, enriched
//! with duration/sample-rate from the reference audio when it can be probed.

use std::sync::Arc;

use async_trait::async_trait;

use crate::foundation::config::RenderConfig;
use crate::foundation::core::clamp_time;
use crate::foundation::error::{AvatarError, AvatarResult};

/// Lexical emotion and pause detection.
pub mod emotion;
/// Text to phoneme timeline.
pub mod phoneme;
/// Audio metadata probing.
pub mod probe;

use probe::{AudioInfo, AudioProbe};

/// One phoneme slot on the speech timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Phoneme {
    /// Phoneme class, e.g. `AH` or `SIL`.
    pub symbol: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Articulation strength in `[0, 1]`.
    pub intensity: f64,
}

/// Emotion buckets recognised by the lexical detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// Positive, upbeat.
    Happy,
    /// Negative, downbeat.
    Sad,
    /// High energy.
    Excited,
    /// Low energy.
    Calm,
    /// No keyword matched.
    Neutral,
}

/// An interval of speech carrying one emotion.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EmotionSpan {
    /// Detected emotion.
    pub emotion: Emotion,
    /// Detector confidence in `[0, 1]`.
    pub confidence: f64,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

/// Everything later stages need to animate the avatar. Immutable once produced.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioAnalysis {
    /// Track length in seconds; every timestamp below lies in `[0, duration]`.
    pub duration: f64,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Time-ordered phoneme timeline.
    pub phonemes: Vec<Phoneme>,
    /// Time-ordered emotion spans.
    pub emotions: Vec<EmotionSpan>,
    /// Transcript characters per second.
    pub speech_rate: f64,
    /// Pause timestamps in seconds.
    pub pause_points: Vec<f64>,
    /// The audio source, present only when probing it succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_source: Option<String>,
}

impl AudioAnalysis {
    /// Build an analysis of `text` over a track of `info.duration_secs`, clipping every timeline
    /// to the track.
    pub fn from_text(text: &str, info: AudioInfo, audio_source: Option<String>) -> Self {
        let duration = info.duration_secs;

        let mut phonemes = phoneme::text_to_phonemes(text);
        // A spoken transcript always keeps at least its first slot, pulled to the start.
        let first = phonemes.first().cloned();
        phonemes.retain(|p| p.start < duration);
        if phonemes.is_empty()
            && let Some(mut p) = first
        {
            p.end -= p.start;
            p.start = 0.0;
            phonemes.push(p);
        }
        for p in &mut phonemes {
            p.end = clamp_time(p.end, duration);
        }

        let mut emotions = emotion::detect_emotions(text);
        emotions.retain(|e| e.start < duration);
        for e in &mut emotions {
            e.end = clamp_time(e.end, duration);
        }
        if emotions.is_empty() {
            emotions.push(emotion::neutral_span(clamp_time(
                phoneme::text_span_secs(text),
                duration,
            )));
        }

        let mut pause_points = emotion::detect_pauses(text);
        pause_points.retain(|&t| t <= duration);

        Self {
            duration,
            sample_rate: info.sample_rate,
            phonemes,
            emotions,
            speech_rate: text.chars().count() as f64 / duration,
            pause_points,
            audio_source,
        }
    }
}

/// Capability that turns a transcript (plus optional audio) into an [`AudioAnalysis`].
///
/// The default is [`HeuristicAnalyzer`]; an acoustic backend can replace it without touching the
/// orchestrator.
#[async_trait]
pub trait SpeechAnalyzer: Send + Sync {
    /// Analyze `text` as spoken in `audio_url`.
    async fn analyze(&self, audio_url: &str, text: &str) -> AvatarResult<AudioAnalysis>;
}

/// Rule-based analyzer: probes the audio for timing when possible and derives everything else
/// from the text alone.
#[derive(Clone)]
pub struct HeuristicAnalyzer {
    probe: Arc<dyn AudioProbe>,
    fallback: AudioInfo,
}

impl HeuristicAnalyzer {
    /// Analyzer that falls back to `fallback` when probing fails.
    pub fn new(probe: Arc<dyn AudioProbe>, fallback: AudioInfo) -> Self {
        Self { probe, fallback }
    }

    /// Analyzer using the fallback duration/sample-rate from `cfg`.
    pub fn from_config(probe: Arc<dyn AudioProbe>, cfg: &RenderConfig) -> Self {
        Self::new(
            probe,
            AudioInfo {
                duration_secs: cfg.fallback_duration_secs,
                sample_rate: cfg.fallback_sample_rate,
            },
        )
    }
}

#[async_trait]
impl SpeechAnalyzer for HeuristicAnalyzer {
    async fn analyze(&self, audio_url: &str, text: &str) -> AvatarResult<AudioAnalysis> {
        if text.trim().is_empty() {
            return Err(AvatarError::analysis("transcript is empty"));
        }

        let (info, audio_source) = match self.probe.probe(audio_url).await {
            Ok(info) => {
                tracing::debug!(
                    audio_url,
                    duration = info.duration_secs,
                    sample_rate = info.sample_rate,
                    "probed reference audio"
                );
                (info, Some(audio_url.to_string()))
            }
            Err(e) => {
                tracing::warn!(
                    audio_url,
                    error = %e,
                    fallback_duration = self.fallback.duration_secs,
                    "audio probe failed, using fallback timing"
                );
                (self.fallback, None)
            }
        };

        Ok(AudioAnalysis::from_text(text, info, audio_source))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/analyzer.rs"]
mod tests;
