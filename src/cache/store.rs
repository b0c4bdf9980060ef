//! Filesystem abstraction used by the orchestrator and the gateway.
//!
//! Metadata is read fresh on every request so decisions always reflect the
//! live filesystem state.

use std::path::Path;
use std::time::SystemTime;

use async_trait::async_trait;
use bytes::Bytes;

/// Metadata for one filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMeta {
    /// Whether the entry is a regular file
    pub is_file: bool,
    /// Last modification time
    pub modified: SystemTime,
}

/// Abstraction over filesystem operations to support test doubles
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Get entry metadata (kind, modification time)
    async fn metadata(&self, path: &Path) -> Result<FileMeta, std::io::Error>;

    /// Create directory and all parent directories
    async fn create_dir_all(&self, path: &Path) -> Result<(), std::io::Error>;

    /// Read entire file contents
    async fn read(&self, path: &Path) -> Result<Bytes, std::io::Error>;
}

/// Portable filesystem store using tokio::fs
#[derive(Debug, Default)]
pub struct TokioFileStore;

impl TokioFileStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileStore for TokioFileStore {
    async fn metadata(&self, path: &Path) -> Result<FileMeta, std::io::Error> {
        let metadata = tokio::fs::metadata(path).await?;
        Ok(FileMeta {
            is_file: metadata.is_file(),
            modified: metadata.modified()?,
        })
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), std::io::Error> {
        tokio::fs::create_dir_all(path).await
    }

    async fn read(&self, path: &Path) -> Result<Bytes, std::io::Error> {
        let data = tokio::fs::read(path).await?;
        Ok(Bytes::from(data))
    }
}
