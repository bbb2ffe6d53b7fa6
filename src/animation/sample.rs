//! Evaluate keyframed lip-sync and gesture tracks at an instant.

use crate::analysis::phoneme::CHAR_SECS;
use crate::animation::ease::Ease;
use crate::animation::gesture::{Gesture, GestureData, GestureKind};
use crate::animation::lipsync::{LipSyncData, MouthShape};
use crate::foundation::core::Vec3;

/// Translation plus rotation applied to one body part.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PartOffset {
    /// Translation in scene units.
    pub position: Vec3,
    /// Rotation in degrees.
    pub rotation: Vec3,
}

impl std::ops::Add for PartOffset {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            position: self.position + rhs.position,
            rotation: self.rotation + rhs.rotation,
        }
    }
}

/// Avatar pose at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvatarPose {
    /// Mouth configuration.
    pub mouth: MouthShape,
    /// Head offset.
    pub head: PartOffset,
    /// Hand offset.
    pub hand: PartOffset,
    /// Torso offset.
    pub body: PartOffset,
}

impl Default for AvatarPose {
    fn default() -> Self {
        Self {
            mouth: MouthShape::REST,
            head: PartOffset::default(),
            hand: PartOffset::default(),
            body: PartOffset::default(),
        }
    }
}

impl AvatarPose {
    /// Offset of the part driven by `kind`.
    pub fn part(&self, kind: GestureKind) -> PartOffset {
        match kind {
            GestureKind::Head => self.head,
            GestureKind::Hand => self.hand,
            GestureKind::Body => self.body,
        }
    }

    fn part_mut(&mut self, kind: GestureKind) -> &mut PartOffset {
        match kind {
            GestureKind::Head => &mut self.head,
            GestureKind::Hand => &mut self.hand,
            GestureKind::Body => &mut self.body,
        }
    }
}

/// Pose at `t` seconds. Missing tracks leave the corresponding parts at rest.
pub fn sample_pose(
    lip: Option<&LipSyncData>,
    gestures: Option<&GestureData>,
    t: f64,
) -> AvatarPose {
    let mut pose = AvatarPose::default();
    if let Some(lip) = lip {
        pose.mouth = sample_mouth(lip, t);
    }
    if let Some(gestures) = gestures {
        for g in &gestures.gestures {
            if let Some(offset) = sample_gesture(g, t) {
                let part = pose.part_mut(g.kind);
                *part = *part + offset;
            }
        }
    }
    pose
}

/// Mouth shape at `t`: linear between keyframes, relaxing to rest over one phoneme slot after the
/// last keyframe.
pub fn sample_mouth(lip: &LipSyncData, t: f64) -> MouthShape {
    let keys = &lip.keyframes;
    let idx = keys.partition_point(|k| k.time <= t);

    if idx == 0 {
        return keys.first().map_or(MouthShape::REST, |k| k.mouth_shape);
    }
    let a = &keys[idx - 1];
    let Some(b) = keys.get(idx) else {
        let fade = Ease::Linear.apply((t - a.time) / CHAR_SECS);
        return a.mouth_shape.lerp(MouthShape::REST, fade);
    };

    let denom = b.time - a.time;
    if denom <= 0.0 {
        return a.mouth_shape;
    }
    let te = Ease::Linear.apply((t - a.time) / denom);
    a.mouth_shape.lerp(b.mouth_shape, te)
}

/// Offset contributed by `gesture` at `t`, eased between keyframes; `None` outside its span.
pub fn sample_gesture(gesture: &Gesture, t: f64) -> Option<PartOffset> {
    if t < gesture.start || t > gesture.end {
        return None;
    }
    let keys = &gesture.keyframes;
    if keys.is_empty() {
        return None;
    }
    let idx = keys.partition_point(|k| k.time <= t);

    let at = |i: usize| PartOffset {
        position: keys[i].position,
        rotation: keys[i].rotation,
    };
    if idx == 0 {
        return Some(at(0));
    }
    if idx >= keys.len() {
        return Some(at(keys.len() - 1));
    }

    let (a, b) = (&keys[idx - 1], &keys[idx]);
    let denom = b.time - a.time;
    if denom <= 0.0 {
        return Some(at(idx - 1));
    }
    let te = Ease::InOutQuad.apply((t - a.time) / denom);
    Some(PartOffset {
        position: a.position.lerp(b.position, te),
        rotation: a.rotation.lerp(b.rotation, te),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/animation/sample.rs"]
mod tests;
