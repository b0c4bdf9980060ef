//! Mock file store for testing (in-memory HashMap storage)

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use super::store::{FileMeta, FileStore};

/// File store that keeps entries in memory for testing
///
/// Modification times are supplied at insertion so staleness scenarios can
/// be constructed without sleeping on a real filesystem.
#[derive(Default)]
pub struct MemoryFileStore {
    files: RwLock<HashMap<PathBuf, (Bytes, SystemTime)>>,
    directories: RwLock<Vec<PathBuf>>,
    simulate_dir_failure: RwLock<bool>,
    metadata_calls: RwLock<Vec<PathBuf>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a regular file with the given modification time
    pub fn insert_file(&self, path: impl Into<PathBuf>, data: Bytes, modified: SystemTime) {
        self.files.write().insert(path.into(), (data, modified));
    }

    /// Insert a directory entry
    pub fn insert_dir(&self, path: impl Into<PathBuf>) {
        self.directories.write().push(path.into());
    }

    /// Make `create_dir_all` fail
    pub fn set_dir_failure(&self, enabled: bool) {
        *self.simulate_dir_failure.write() = enabled;
    }

    /// Number of stored files
    pub fn file_count(&self) -> usize {
        self.files.read().len()
    }

    /// Whether a directory was created for `path`
    pub fn has_dir(&self, path: &Path) -> bool {
        self.directories.read().iter().any(|p| p == path)
    }

    /// Paths that have been stat'ed, in call order
    pub fn metadata_calls(&self) -> Vec<PathBuf> {
        self.metadata_calls.read().clone()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn metadata(&self, path: &Path) -> Result<FileMeta, std::io::Error> {
        self.metadata_calls.write().push(path.to_path_buf());

        if let Some((_, modified)) = self.files.read().get(path) {
            return Ok(FileMeta {
                is_file: true,
                modified: *modified,
            });
        }

        if self.directories.read().iter().any(|p| p == path) {
            return Ok(FileMeta {
                is_file: false,
                modified: SystemTime::UNIX_EPOCH,
            });
        }

        Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found",
        ))
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), std::io::Error> {
        if *self.simulate_dir_failure.read() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "Simulated permission denied",
            ));
        }

        let mut dirs = self.directories.write();
        if !dirs.contains(&path.to_path_buf()) {
            dirs.push(path.to_path_buf());
        }
        Ok(())
    }

    async fn read(&self, path: &Path) -> Result<Bytes, std::io::Error> {
        self.files
            .read()
            .get(path)
            .map(|(data, _)| data.clone())
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "File not found"))
    }
}
