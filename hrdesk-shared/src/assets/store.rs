//! Content store for uploaded images.
//!
//! Keys are flat file names; the local implementation maps them directly
//! under a root directory that is also served read-only at `/storage/`.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// Flat key/bytes store for public assets
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Writes `bytes` under `key`, replacing any existing content
    async fn put(&self, key: &str, bytes: &[u8]) -> io::Result<()>;

    async fn exists(&self, key: &str) -> io::Result<bool>;

    /// Removes `key`; removing a missing key is not an error
    async fn delete(&self, key: &str) -> io::Result<()>;
}

/// [`ContentStore`] backed by a local directory
#[derive(Debug, Clone)]
pub struct LocalContentStore {
    root: PathBuf,
}

impl LocalContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root directory if it does not exist yet
    pub async fn ensure_root(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        let invalid = key.is_empty()
            || key.contains('/')
            || key.contains('\\')
            || key.contains("..")
            || key.contains('\0');

        if invalid {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid content key: {:?}", key),
            ));
        }

        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ContentStore for LocalContentStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.path_for(key)?;
        self.ensure_root().await?;
        tokio::fs::write(path, bytes).await
    }

    async fn exists(&self, key: &str) -> io::Result<bool> {
        let path = self.path_for(key)?;
        tokio::fs::try_exists(path).await
    }

    async fn delete(&self, key: &str) -> io::Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
