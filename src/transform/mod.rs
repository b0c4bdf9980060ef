//! Transform Engine: decode, resize, and re-encode image files.
//!
//! The gateway core only depends on the [`TransformEngine`] trait; the
//! built-in [`ResizeEngine`] implements it with the `image` crate, and
//! [`CountingEngine`] is a recording double for tests.

pub mod counting;
pub mod engine;
pub mod error;

use std::path::Path;

use async_trait::async_trait;

pub use counting::CountingEngine;
pub use engine::ResizeEngine;
pub use error::TransformError;

use crate::params::TransformParams;

/// Abstraction over the image transform operation
///
/// Reads the image at `source`, applies `params`, and writes the encoded
/// result to `destination`. The destination's parent directory is expected
/// to exist.
#[async_trait]
pub trait TransformEngine: Send + Sync {
    async fn transform(
        &self,
        source: &Path,
        destination: &Path,
        params: &TransformParams,
    ) -> Result<(), TransformError>;
}
