//! Request path resolution.
//!
//! Maps a percent-decoded request path onto the filesystem: the first
//! `ROUTE_PREFIX_SEGMENTS` segments belong to the routing mount point and
//! are stripped, the remainder is lexically normalized so traversal
//! sequences cannot escape the static root, and the same relative path is
//! mirrored beneath the cache root under a parameter-keyed subdirectory.
//!
//! Pure path computation: no I/O, no failure mode. Existence is checked
//! by a separate step.

use std::path::{Component, Path, PathBuf};

use crate::config::MountConfig;
use crate::constants::ROUTE_PREFIX_SEGMENTS;

/// Paths derived from one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Normalized path relative to the static root
    pub relative: PathBuf,
    /// Absolute path of the source file beneath the static root
    pub source: PathBuf,
    /// Absolute path of the cached derivative for the given parameter segment
    pub cache: PathBuf,
}

/// Resolve a request path against a mount
///
/// `request_path` is the percent-decoded URI path with the query already
/// stripped. `segment` is the parameter-set encoding from
/// [`crate::params::TransformParams::cache_segment`].
pub fn resolve(mount: &MountConfig, request_path: &str, segment: &str) -> ResolvedPaths {
    let relative = normalize_relative(strip_route_prefix(request_path));
    let source = mount.static_dir().join(&relative);
    let cache = mount.cache_dir().join(segment).join(&relative);

    ResolvedPaths {
        relative,
        source,
        cache,
    }
}

/// Drop the leading mount-point segments from a request path
fn strip_route_prefix(request_path: &str) -> PathBuf {
    request_path
        .split('/')
        .filter(|s| !s.is_empty())
        .skip(ROUTE_PREFIX_SEGMENTS)
        .collect()
}

/// Lexically collapse `.` and `..` components, clamping at the root
///
/// `..` at the top is dropped rather than propagated, so the result can
/// never point above the directory it is joined onto.
fn normalize_relative(path: PathBuf) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    normalized
}
