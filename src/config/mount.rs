//! Mount configuration: the static root served by the gateway.
//!
//! A mount is created once at setup and shared read-only by every request.
//! The cache directory defaults to `.cache` beneath the static root.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CACHE_DIR_NAME;

/// Per-mount settings: static root, cache root, and static-fallback flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MountConfig {
    /// Absolute path of the static file root
    pub static_dir: PathBuf,
    /// Cache root for resized derivatives (default: `<static_dir>/.cache`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    /// Serve unmodified files when no resize was requested (default: false)
    #[serde(default)]
    pub serve_static: bool,
}

impl MountConfig {
    /// Create a mount over `static_dir` with default options
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
            cache_dir: None,
            serve_static: false,
        }
    }

    /// Override the cache directory
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    /// Enable or disable serving unmodified files
    pub fn with_serve_static(mut self, serve_static: bool) -> Self {
        self.serve_static = serve_static;
        self
    }

    /// Effective cache root, applying the default beneath the static root
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| self.static_dir.join(DEFAULT_CACHE_DIR_NAME))
    }

    /// Effective static root
    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_defaults() {
        let mount = MountConfig::new("/srv/static");

        assert_eq!(mount.static_dir(), Path::new("/srv/static"));
        assert_eq!(mount.cache_dir(), PathBuf::from("/srv/static/.cache"));
        assert!(!mount.serve_static);
    }

    #[test]
    fn test_mount_overrides() {
        let mount = MountConfig::new("/srv/static")
            .with_cache_dir("/var/cache/thumbs")
            .with_serve_static(true);

        assert_eq!(mount.cache_dir(), PathBuf::from("/var/cache/thumbs"));
        assert!(mount.serve_static);
    }

    #[test]
    fn test_mount_deserialize_defaults() {
        let yaml = r#"
static_dir: "/srv/static"
"#;
        let mount: MountConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(mount.cache_dir(), PathBuf::from("/srv/static/.cache"));
        assert!(!mount.serve_static);
    }

    #[test]
    fn test_mount_deserialize_custom() {
        let yaml = r#"
static_dir: "/srv/static"
cache_dir: "/var/cache/thumbs"
serve_static: true
"#;
        let mount: MountConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(mount.cache_dir(), PathBuf::from("/var/cache/thumbs"));
        assert!(mount.serve_static);
    }
}
