//! Frame-sequence to video assembly.

/// ffmpeg-backed assembler.
pub mod ffmpeg;
