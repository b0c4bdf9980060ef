//! Per-request context carried through the Pingora filter chain

use std::time::Instant;

use uuid::Uuid;

/// Request-scoped state: a unique id for log correlation and the start
/// instant for latency fields
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    started: Instant,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            started: Instant::now(),
        }
    }

    /// Get the unique request ID
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Time elapsed since the request entered the gateway
    pub fn elapsed(&self) -> std::time::Duration {
        self.started.elapsed()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
