//! Request and job records exchanged with callers.

/// Render jobs and their lifecycle.
pub mod job;
/// Render requests and avatar settings.
pub mod request;
