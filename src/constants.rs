// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers improves maintainability
// and makes it easier to understand and modify defaults.

// =============================================================================
// Server defaults
// =============================================================================

/// Default number of worker threads
pub const DEFAULT_THREADS: usize = 4;

/// Default upstream port when none is configured
pub const DEFAULT_UPSTREAM_PORT: u16 = 80;

// =============================================================================
// Mount defaults
// =============================================================================

/// Name of the cache directory created beneath the static root when no
/// explicit cache directory is configured
pub const DEFAULT_CACHE_DIR_NAME: &str = ".cache";

/// Number of leading request-path segments belonging to the routing mount
/// point, stripped before the remainder is resolved beneath the static root
pub const ROUTE_PREFIX_SEGMENTS: usize = 2;

// =============================================================================
// Dispatch defaults
// =============================================================================

/// File suffix exempt from resizing regardless of query parameters
pub const RESIZE_EXEMPT_SUFFIX: &str = ".svg";

/// Fallback Content-Type for files with an unrecognized extension
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
