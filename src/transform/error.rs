//! Error types for transform operations

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transform task aborted: {0}")]
    Aborted(String),
}
