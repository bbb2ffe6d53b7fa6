//! Publishing rendered artifacts to blob storage.

use async_trait::async_trait;

use crate::foundation::error::{AvatarError, AvatarResult};

mod local;

pub use local::LocalPublisher;

/// Capability that stores bytes under a key and returns a public URL.
#[async_trait]
pub trait StoragePublisher: Send + Sync {
    /// Store `bytes` at `key` with the given MIME type; returns the public URL.
    async fn publish(&self, key: &str, bytes: Vec<u8>, content_type: &str)
    -> AvatarResult<String>;
}

/// Reject keys that could escape the storage root or address a directory.
pub fn validate_key(key: &str) -> AvatarResult<()> {
    if key.trim().is_empty() {
        return Err(AvatarError::publish("storage key is empty"));
    }
    if key.contains('\\') {
        return Err(AvatarError::publish(format!(
            "storage key '{key}' contains a backslash"
        )));
    }
    if key
        .split('/')
        .any(|seg| seg.is_empty() || seg == "." || seg == "..")
    {
        return Err(AvatarError::publish(format!(
            "storage key '{key}' has an empty or relative segment"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/publish/mod.rs"]
mod tests;
