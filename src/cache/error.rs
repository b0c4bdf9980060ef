//! Error types for cache orchestration

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    /// The source was modified after its derivative was cached. The
    /// orchestrator reports this instead of regenerating; the entry stays
    /// untouched until it is invalidated out of band.
    #[error("source {src} is newer than cached derivative {cache}")]
    Stale { src: PathBuf, cache: PathBuf },
}
