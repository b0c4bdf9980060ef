//! Recording transform double for tests (call counting, optional failure)

use std::path::Path;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use super::error::TransformError;
use super::TransformEngine;
use crate::params::TransformParams;

/// Engine double that counts invocations instead of resampling pixels
///
/// With `copy_through` enabled it copies the source file to the destination,
/// standing in for a successful transform on a real filesystem.
#[derive(Default)]
pub struct CountingEngine {
    calls: Mutex<usize>,
    simulate_failure: RwLock<bool>,
    copy_through: RwLock<bool>,
}

impl CountingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `transform` has been invoked
    pub fn call_count(&self) -> usize {
        *self.calls.lock()
    }

    /// Make subsequent transforms fail
    pub fn set_failure(&self, enabled: bool) {
        *self.simulate_failure.write() = enabled;
    }

    /// Copy the source to the destination on success
    pub fn set_copy_through(&self, enabled: bool) {
        *self.copy_through.write() = enabled;
    }
}

#[async_trait]
impl TransformEngine for CountingEngine {
    async fn transform(
        &self,
        source: &Path,
        destination: &Path,
        _params: &TransformParams,
    ) -> Result<(), TransformError> {
        *self.calls.lock() += 1;

        if *self.simulate_failure.read() {
            return Err(TransformError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "Simulated transform failure",
            )));
        }

        if *self.copy_through.read() {
            tokio::fs::copy(source, destination).await?;
        }

        Ok(())
    }
}
