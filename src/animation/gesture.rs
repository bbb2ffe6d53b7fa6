//! Procedural gestures: emotion-driven motion, idle head movement and pause reactions.
//!
//! The three generators are independent; their outputs are concatenated and may overlap in
//! time. Consumers layer overlapping gestures additively.

use std::f64::consts::PI;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::analysis::{AudioAnalysis, Emotion, EmotionSpan};
use crate::foundation::config::GestureSettings;
use crate::foundation::core::{Vec3, clamp_time};
use crate::model::request::AvatarConfig;

/// Which part of the avatar a gesture moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    /// Hand/arm motion.
    Hand,
    /// Head rotation.
    Head,
    /// Torso motion.
    Body,
}

impl GestureKind {
    /// Body part that expresses `emotion`.
    pub fn for_emotion(emotion: Emotion) -> Self {
        match emotion {
            Emotion::Happy | Emotion::Excited => Self::Hand,
            Emotion::Calm => Self::Body,
            Emotion::Sad | Emotion::Neutral => Self::Head,
        }
    }
}

/// Pose offset at one instant of a gesture.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GestureKeyframe {
    /// Time in seconds.
    pub time: f64,
    /// Translation in scene units.
    pub position: Vec3,
    /// Rotation in degrees.
    pub rotation: Vec3,
}

impl GestureKeyframe {
    fn rotation_only(time: f64, rotation: Vec3) -> Self {
        Self {
            time,
            position: Vec3::ZERO,
            rotation,
        }
    }
}

/// One keyframed gesture.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Gesture {
    /// Body part.
    pub kind: GestureKind,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds, never past the clip duration.
    pub end: f64,
    /// Strength in `[0, 1]`.
    pub intensity: f64,
    /// Time-ordered keyframes.
    pub keyframes: Vec<GestureKeyframe>,
}

/// All gestures of a clip.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GestureData {
    /// Flat, possibly overlapping list: emotion gestures, then idle head movement, then pause
    /// reactions.
    pub gestures: Vec<Gesture>,
}

impl GestureData {
    /// Run all three generators and concatenate their output.
    ///
    /// Idle look-away magnitudes are random; pass `settings.seed` for reproducible output.
    pub fn generate(
        analysis: &AudioAnalysis,
        avatar: &AvatarConfig,
        settings: &GestureSettings,
    ) -> Self {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let duration = analysis.duration;
        let mut gestures = emotion_gestures(&analysis.emotions, duration, avatar.gesture_factor());
        gestures.extend(idle_head_movements(
            duration,
            avatar.eye_contact_factor(),
            settings,
            &mut rng,
        ));
        gestures.extend(pause_reactions(&analysis.pause_points, duration, settings));

        Self { gestures }
    }

    /// Gestures of one kind.
    pub fn of_kind(&self, kind: GestureKind) -> impl Iterator<Item = &Gesture> {
        self.gestures.iter().filter(move |g| g.kind == kind)
    }
}

/// One gesture per emotion span, intensity `confidence * gesture_factor`.
pub fn emotion_gestures(
    emotions: &[EmotionSpan],
    duration: f64,
    gesture_factor: f64,
) -> Vec<Gesture> {
    emotions
        .iter()
        .map(|span| {
            let kind = GestureKind::for_emotion(span.emotion);
            let intensity = span.confidence * gesture_factor;
            let start = clamp_time(span.start, duration);
            let end = clamp_time(span.end, duration).max(start);
            Gesture {
                kind,
                start,
                end,
                intensity,
                keyframes: parametric_keyframes(kind, start, end, intensity),
            }
        })
        .collect()
}

/// Keyframes at roughly two per second (at least two steps), shaped per body part as a function
/// of normalized progress through the span.
pub fn parametric_keyframes(
    kind: GestureKind,
    start: f64,
    end: f64,
    intensity: f64,
) -> Vec<GestureKeyframe> {
    let span = end - start;
    let steps = ((span * 2.0).floor() as usize).max(2);

    (0..=steps)
        .map(|i| {
            let progress = i as f64 / steps as f64;
            let time = (start + span * progress).min(end);
            let (position, rotation) = match kind {
                GestureKind::Hand => (
                    Vec3::new(
                        (progress * PI * 2.0).sin() * intensity * 0.2,
                        (progress * PI * 2.0).cos() * intensity * 0.1,
                        0.0,
                    ),
                    Vec3::new(
                        (progress * PI).sin() * intensity * 15.0,
                        0.0,
                        (progress * PI).cos() * intensity * 10.0,
                    ),
                ),
                GestureKind::Head => (
                    Vec3::ZERO,
                    Vec3::new(
                        (progress * PI * 0.5).sin() * intensity * 5.0,
                        (progress * PI * 0.3).cos() * intensity * 8.0,
                        (progress * PI * 0.7).sin() * intensity * 3.0,
                    ),
                ),
                GestureKind::Body => (
                    Vec3::new(0.0, (progress * PI).sin() * intensity * 0.05, 0.0),
                    Vec3::new(
                        (progress * PI * 0.2).sin() * intensity * 2.0,
                        0.0,
                        (progress * PI * 0.3).cos() * intensity,
                    ),
                ),
            };
            GestureKeyframe {
                time,
                position,
                rotation,
            }
        })
        .collect()
}

/// A look-away-and-return head turn every `idle_interval_secs`; `floor(duration / interval)`
/// movements in total.
pub fn idle_head_movements(
    duration: f64,
    eye_contact: f64,
    settings: &GestureSettings,
    rng: &mut impl Rng,
) -> Vec<Gesture> {
    let interval = settings.idle_interval_secs;
    if !(interval > 0.0 && duration > 0.0) {
        return Vec::new();
    }
    let count = (duration / interval).floor() as usize;

    (0..count)
        .map(|i| {
            let start = i as f64 * interval;
            let end = clamp_time(start + settings.idle_duration_secs, duration);
            let peak = Vec3::new(
                rng.gen_range(-0.5..0.5) * 10.0 * eye_contact,
                rng.gen_range(-0.5..0.5) * 15.0 * eye_contact,
                rng.gen_range(-0.5..0.5) * 5.0 * eye_contact,
            );
            Gesture {
                kind: GestureKind::Head,
                start,
                end,
                intensity: eye_contact,
                keyframes: vec![
                    GestureKeyframe::rotation_only(start, Vec3::ZERO),
                    GestureKeyframe::rotation_only((start + end) / 2.0, peak),
                    GestureKeyframe::rotation_only(end, Vec3::ZERO),
                ],
            }
        })
        .collect()
}

/// A short, low-intensity nod with a slight tilt at every pause.
pub fn pause_reactions(
    pauses: &[f64],
    duration: f64,
    settings: &GestureSettings,
) -> Vec<Gesture> {
    let intensity = settings.pause_reaction_intensity;
    pauses
        .iter()
        .map(|&t| {
            let start = clamp_time(t, duration);
            let end = clamp_time(start + settings.pause_reaction_secs, duration);
            let nod = Vec3::new(6.0 * intensity, 0.0, 2.0 * intensity);
            Gesture {
                kind: GestureKind::Head,
                start,
                end,
                intensity,
                keyframes: vec![
                    GestureKeyframe::rotation_only(start, Vec3::ZERO),
                    GestureKeyframe::rotation_only((start + end) / 2.0, nod),
                    GestureKeyframe::rotation_only(end, Vec3::ZERO),
                ],
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/gesture.rs"]
mod tests;
