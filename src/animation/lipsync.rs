//! Phoneme timeline to mouth-shape keyframes and facial blend-shape curves.

use crate::analysis::AudioAnalysis;

/// Canonical mouth configuration for one viseme.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MouthShape {
    /// Jaw opening, 0 (closed) to 1.
    pub openness: f64,
    /// Lip corner spread, 0 (narrow) to 1.
    pub width: f64,
    /// Vertical lip offset, -1 (protruded/rounded) to 1 (retracted).
    pub lip_position: f64,
}

impl MouthShape {
    /// Closed, relaxed mouth.
    pub const REST: Self = Self {
        openness: 0.0,
        width: 0.5,
        lip_position: 0.0,
    };

    const fn new(openness: f64, width: f64, lip_position: f64) -> Self {
        Self {
            openness,
            width,
            lip_position,
        }
    }

    fn mean3(a: Self, b: Self, c: Self) -> Self {
        Self {
            openness: (a.openness + b.openness + c.openness) / 3.0,
            width: (a.width + b.width + c.width) / 3.0,
            lip_position: (a.lip_position + b.lip_position + c.lip_position) / 3.0,
        }
    }

    /// Component-wise linear interpolation.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        use crate::foundation::core::lerp;
        Self {
            openness: lerp(self.openness, other.openness, t),
            width: lerp(self.width, other.width, t),
            lip_position: lerp(self.lip_position, other.lip_position, t),
        }
    }
}

/// Mouth shape for a viseme. Vowels open the jaw, bilabials close it, anything unknown rests.
pub fn mouth_shape(viseme: &str) -> MouthShape {
    match viseme {
        "AH" => MouthShape::new(0.8, 0.6, 0.0),
        "EH" => MouthShape::new(0.4, 0.8, 0.2),
        "IH" => MouthShape::new(0.2, 0.9, 0.4),
        "OH" => MouthShape::new(0.6, 0.3, -0.2),
        "UH" => MouthShape::new(0.3, 0.2, -0.4),
        "B" | "M" | "P" => MouthShape::new(0.0, 0.5, 0.0),
        "F" | "V" => MouthShape::new(0.1, 0.7, 0.3),
        _ => MouthShape::REST,
    }
}

/// Blend shapes driven by lip-sync, in output order.
pub const BLEND_SHAPES: [&str; 5] = [
    "jawOpen",
    "mouthClose",
    "mouthFunnel",
    "mouthPucker",
    "mouthSmile",
];

/// Weight of `viseme` on blend shape `shape`; zero when the pair has no entry.
pub fn blend_shape_influence(shape: &str, viseme: &str) -> f64 {
    match (shape, viseme) {
        ("jawOpen", "AH") => 0.8,
        ("jawOpen", "OH") => 0.6,
        ("jawOpen", "EH") => 0.4,
        ("mouthClose", "B" | "M" | "P") => 1.0,
        ("mouthFunnel", "OH") => 0.7,
        ("mouthFunnel", "UH") => 0.8,
        ("mouthPucker", "UH") => 0.9,
        ("mouthPucker", "OH") => 0.5,
        ("mouthSmile", "IH") => 0.6,
        ("mouthSmile", "EH") => 0.4,
        _ => 0.0,
    }
}

/// One mouth keyframe, placed at a phoneme's start.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LipKeyframe {
    /// Time in seconds.
    pub time: f64,
    /// Viseme (phoneme class) shown at this instant.
    pub viseme: String,
    /// Articulation strength.
    pub intensity: f64,
    /// Mouth configuration.
    pub mouth_shape: MouthShape,
}

/// One `(time, value)` sample of a blend-shape curve.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveSample {
    /// Time in seconds.
    pub time: f64,
    /// Blend weight.
    pub value: f64,
}

/// A named blend-shape animation curve.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlendShapeCurve {
    /// Blend-shape name, one of [`BLEND_SHAPES`].
    pub name: String,
    /// Samples, one per lip keyframe.
    pub values: Vec<CurveSample>,
}

/// Lip-sync animation for one clip.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LipSyncData {
    /// Time-ordered mouth keyframes.
    pub keyframes: Vec<LipKeyframe>,
    /// One curve per entry of [`BLEND_SHAPES`].
    pub blend_shapes: Vec<BlendShapeCurve>,
}

impl LipSyncData {
    /// Keyframes plus blend curves for `analysis`. Pure function of its input.
    pub fn from_analysis(analysis: &AudioAnalysis) -> Self {
        let mut keyframes: Vec<LipKeyframe> = analysis
            .phonemes
            .iter()
            .map(|p| LipKeyframe {
                time: p.start,
                viseme: p.symbol.clone(),
                intensity: p.intensity,
                mouth_shape: mouth_shape(&p.symbol),
            })
            .collect();
        smooth_keyframes(&mut keyframes);
        let blend_shapes = blend_shape_curves(&keyframes);
        Self {
            keyframes,
            blend_shapes,
        }
    }

    /// Curve by name.
    pub fn curve(&self, name: &str) -> Option<&BlendShapeCurve> {
        self.blend_shapes.iter().find(|c| c.name == name)
    }
}

/// Replace every interior mouth shape with the mean of itself and its two neighbours.
///
/// Neighbour values are read from the unsmoothed input; the first and last keyframes are left
/// untouched.
pub fn smooth_keyframes(keyframes: &mut [LipKeyframe]) {
    if keyframes.len() < 3 {
        return;
    }
    let raw: Vec<MouthShape> = keyframes.iter().map(|k| k.mouth_shape).collect();
    for (i, kf) in keyframes
        .iter_mut()
        .enumerate()
        .take(raw.len() - 1)
        .skip(1)
    {
        kf.mouth_shape = MouthShape::mean3(raw[i - 1], raw[i], raw[i + 1]);
    }
}

/// Sample every shape in [`BLEND_SHAPES`] at each keyframe: `influence * intensity`.
pub fn blend_shape_curves(keyframes: &[LipKeyframe]) -> Vec<BlendShapeCurve> {
    BLEND_SHAPES
        .iter()
        .map(|&name| BlendShapeCurve {
            name: name.to_string(),
            values: keyframes
                .iter()
                .map(|kf| CurveSample {
                    time: kf.time,
                    value: blend_shape_influence(name, &kf.viseme) * kf.intensity,
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/lipsync.rs"]
mod tests;
