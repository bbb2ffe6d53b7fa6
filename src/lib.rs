//! Avatar render-job orchestration.
//!
//! Turns a transcript plus a reference audio track into a lip-synced, gesturing avatar clip:
//!
//! - analyze the speech into phoneme, emotion and pause timelines ([`analysis`])
//! - synthesize lip-sync curves and procedural gestures ([`animation`])
//! - rasterize frames, assemble them with ffmpeg and publish the result ([`pipeline`])
//!
//! [`JobOrchestrator`] runs each request as a background job and exposes its status for polling.
//! Speech analysis, rasterization, assembly, storage and the job registry are traits so each
//! backend can be swapped independently.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod analysis;
pub mod animation;
pub mod encode;
/// Core types, errors and configuration.
pub mod foundation;
pub mod model;
pub mod orchestrator;
pub mod pipeline;
pub mod publish;
pub mod render;

pub use crate::analysis::probe::{AudioInfo, AudioProbe, FfprobeAudioProbe};
pub use crate::analysis::{AudioAnalysis, Emotion, HeuristicAnalyzer, SpeechAnalyzer};
pub use crate::animation::gesture::{GestureData, GestureKind};
pub use crate::animation::lipsync::LipSyncData;
pub use crate::encode::ffmpeg::{AssemblyJob, AssemblyOutcome, FfmpegAssembler, VideoAssembler};
pub use crate::foundation::config::RenderConfig;
pub use crate::foundation::core::{Fps, FrameIndex, Resolution};
pub use crate::foundation::error::{AvatarError, AvatarResult};
pub use crate::model::job::{JobId, JobSnapshot, JobStatus, RenderJob};
pub use crate::model::request::{AvatarConfig, AvatarRenderRequest, Quality};
pub use crate::orchestrator::{Capabilities, InMemoryJobStore, JobOrchestrator, JobStore};
pub use crate::publish::{LocalPublisher, StoragePublisher};
pub use crate::render::frame::{FrameRGBA, FrameRenderer, FrameRequest, SilhouetteRenderer};
