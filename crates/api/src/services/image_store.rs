//! Filesystem-backed storage for wish images.

use domain::bridge::ImageStore;
use domain::error::StoreError;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::config::StorageConfig;

/// Writes images under a directory that is served at `public_base_url`.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.image_dir, &config.public_base_url)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `key` below the root, refusing anything that could escape it.
    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StoreError::Backend(format!("invalid image key {:?}", key)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl ImageStore for LocalImageStore {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Backend(format!("create {}: {}", parent.display(), e)))?;
        }

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| StoreError::Backend(format!("write {}: {}", path.display(), e)))?;

        debug!(
            key = %key,
            content_type = %content_type,
            size = bytes.len(),
            "Stored wish image"
        );
        Ok(format!("{}/{}", self.public_base_url, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("wish-images-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_put_writes_file_and_returns_url() {
        let root = temp_root();
        let store = LocalImageStore::new(&root, "/images/");

        let url = store
            .put("wishes/abc/def.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap();

        assert_eq!(url, "/images/wishes/abc/def.png");
        let written = tokio::fs::read(root.join("wishes/abc/def.png")).await.unwrap();
        assert_eq!(written, vec![1, 2, 3]);

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_put_rejects_escaping_keys() {
        let store = LocalImageStore::new(temp_root(), "/images");
        for key in ["../etc/passwd", "/abs.png", "", "a/../../b.png"] {
            assert!(store.put(key, "image/png", vec![0]).await.is_err(), "{}", key);
        }
    }
}
