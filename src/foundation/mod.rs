/// Runtime configuration.
pub mod config;
/// Frame/time primitives and small math helpers.
pub mod core;
/// Crate error type.
pub mod error;
