//! Frame rasterization.

/// Frame buffers, the renderer capability and PNG persistence.
pub mod frame;
