//! Procedural animation: lip-sync and gesture synthesis plus pose sampling.

/// Easing curves.
pub mod ease;
/// Procedural gesture synthesis.
pub mod gesture;
/// Lip-sync keyframes and blend-shape curves.
pub mod lipsync;
/// Pose sampling.
pub mod sample;
