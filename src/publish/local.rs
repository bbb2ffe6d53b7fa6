use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::foundation::error::{AvatarError, AvatarResult};
use crate::publish::{StoragePublisher, validate_key};

/// [`StoragePublisher`] writing into a local directory served under `base_url`.
#[derive(Clone, Debug)]
pub struct LocalPublisher {
    root: PathBuf,
    base_url: String,
}

impl LocalPublisher {
    /// Publisher rooted at `root`; URLs are `<base_url>/<key>`.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> AvatarResult<Self> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(AvatarError::validation("publish root is empty"));
        }
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { root, base_url })
    }

    /// Publisher whose URLs are `file://` paths under `root`.
    pub fn file_urls(root: impl Into<PathBuf>) -> AvatarResult<Self> {
        let root = root.into();
        let base_url = format!("file://{}", root.display());
        Self::new(root, base_url)
    }

    /// Filesystem path backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl StoragePublisher for LocalPublisher {
    async fn publish(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AvatarResult<String> {
        validate_key(key)?;
        let target = self.path_for(key);
        let temp = target.with_extension("part");

        let write = async {
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let mut file = tokio::fs::File::create(&temp).await?;
            file.write_all(&bytes).await?;
            file.flush().await?;
            drop(file);
            tokio::fs::rename(&temp, &target).await
        };
        write.await.map_err(|e| {
            AvatarError::publish(format!("failed to store '{}': {e}", target.display()))
        })?;

        tracing::debug!(key, content_type, size = bytes.len(), "published artifact");
        Ok(format!("{}/{key}", self.base_url))
    }
}
