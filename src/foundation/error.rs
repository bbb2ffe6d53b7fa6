/// Result alias used across the crate.
pub type AvatarResult<T> = Result<T, AvatarError>;

/// Error type shared by every pipeline stage and capability.
///
/// Display strings carry a stable prefix per category; [`AvatarError::detail`] returns the bare
/// message, which is what a failed job records.
#[derive(thiserror::Error, Debug)]
pub enum AvatarError {
    /// A request or configuration value was rejected before any work started.
    #[error("validation error: {0}")]
    Validation(String),

    /// Text or audio analysis failed.
    #[error("analysis error: {0}")]
    Analysis(String),

    /// The frame rasterizer failed.
    #[error("render error: {0}")]
    Render(String),

    /// The frame-to-video assembler reported a failure.
    #[error("assembly error: {0}")]
    Assembly(String),

    /// Publishing an artifact to storage failed.
    #[error("publish error: {0}")]
    Publish(String),

    /// The job store rejected an operation.
    #[error("storage error: {0}")]
    Storage(String),

    /// Anything else, usually I/O with attached context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AvatarError {
    /// Build an [`AvatarError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`AvatarError::Analysis`].
    pub fn analysis(msg: impl Into<String>) -> Self {
        Self::Analysis(msg.into())
    }

    /// Build an [`AvatarError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`AvatarError::Assembly`].
    pub fn assembly(msg: impl Into<String>) -> Self {
        Self::Assembly(msg.into())
    }

    /// Build an [`AvatarError::Publish`].
    pub fn publish(msg: impl Into<String>) -> Self {
        Self::Publish(msg.into())
    }

    /// Build an [`AvatarError::Storage`].
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// The message without its category prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::Validation(m)
            | Self::Analysis(m)
            | Self::Render(m)
            | Self::Assembly(m)
            | Self::Publish(m)
            | Self::Storage(m) => m.clone(),
            Self::Other(e) => format!("{e:#}"),
        }
    }
}

impl From<std::io::Error> for AvatarError {
    fn from(e: std::io::Error) -> Self {
        Self::Other(anyhow::Error::new(e))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
