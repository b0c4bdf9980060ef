//! Cache orchestration: decide between the cached derivative, a fresh
//! transform, and the unmodified source.
//!
//! All durable state lives on the filesystem; the orchestrator holds no
//! per-request state and reads entry metadata fresh on every lookup.

pub mod error;
pub mod memory_store;
pub mod store;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

pub use error::CacheError;
pub use memory_store::MemoryFileStore;
pub use store::{FileMeta, FileStore, TokioFileStore};

use crate::params::TransformParams;
use crate::transform::TransformEngine;

/// Condition of a cache entry relative to its source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// No usable entry exists at the cache path
    NoEntry,
    /// The entry is at least as new as the source
    Fresh,
    /// The source was modified after the entry was written
    Stale,
}

/// Classify a cache entry against the source's modification time
///
/// A missing entry and a non-file entry are both treated as absent.
pub fn classify(source_modified: SystemTime, cache_meta: Option<&FileMeta>) -> CacheState {
    match cache_meta {
        Some(meta) if meta.is_file => {
            if source_modified > meta.modified {
                CacheState::Stale
            } else {
                CacheState::Fresh
            }
        }
        _ => CacheState::NoEntry,
    }
}

/// Decides whether to reuse, regenerate, or bypass the cached derivative
pub struct CacheOrchestrator {
    store: Arc<dyn FileStore>,
    engine: Arc<dyn TransformEngine>,
}

impl CacheOrchestrator {
    pub fn new(store: Arc<dyn FileStore>, engine: Arc<dyn TransformEngine>) -> Self {
        Self { store, engine }
    }

    /// Produce the path to serve for a resize request
    ///
    /// `source_modified` comes from the dispatcher's stat of the source,
    /// which has already confirmed a regular file exists there.
    ///
    /// A fresh entry is returned as-is. A missing entry triggers a cache
    /// fill, which degrades to the source path on any failure. A stale
    /// entry is a hard error: the derivative is never regenerated here,
    /// the entry stays untouched until invalidated out of band.
    pub async fn lookup(
        &self,
        source_modified: SystemTime,
        source: &Path,
        cache: &Path,
        params: &TransformParams,
    ) -> Result<PathBuf, CacheError> {
        let cache_meta = match self.store.metadata(cache).await {
            Ok(meta) => Some(meta),
            Err(e) => {
                tracing::debug!(cache = %cache.display(), error = %e, "No cache entry");
                None
            }
        };

        match classify(source_modified, cache_meta.as_ref()) {
            CacheState::NoEntry => Ok(self.fill(source, cache, params).await),
            CacheState::Fresh => Ok(cache.to_path_buf()),
            CacheState::Stale => Err(CacheError::Stale {
                src: source.to_path_buf(),
                cache: cache.to_path_buf(),
            }),
        }
    }

    /// Generate the derivative at `cache`, returning the path to serve
    ///
    /// Directory creation is idempotent and safe to race across concurrent
    /// requests. Any failure falls back to the unmodified source path so
    /// the request still gets a response.
    async fn fill(&self, source: &Path, cache: &Path, params: &TransformParams) -> PathBuf {
        if let Some(parent) = cache.parent() {
            if let Err(e) = self.store.create_dir_all(parent).await {
                tracing::warn!(
                    cache = %cache.display(),
                    error = %e,
                    "Failed to create cache directory, serving source"
                );
                return source.to_path_buf();
            }
        }

        match self.engine.transform(source, cache, params).await {
            Ok(()) => cache.to_path_buf(),
            Err(e) => {
                tracing::warn!(
                    source = %source.display(),
                    cache = %cache.display(),
                    error = %e,
                    "Transform failed, serving source"
                );
                source.to_path_buf()
            }
        }
    }
}
