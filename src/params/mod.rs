//! Transform parameter parsing and cache-key encoding.
//!
//! Parameters arrive as query-string pairs, e.g. `?width=800&height=600`.
//! A parameter set also determines the cache subdirectory its derivatives
//! are stored in: `cache_segment()` produces a filesystem-safe encoding
//! that is identical for identical sets regardless of query order.

use std::collections::HashMap;

/// Resize options parsed from a request's query string
///
/// Unrecognized query keys are ignored and never forwarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformParams {
    /// Target width in pixels
    pub width: Option<u32>,
    /// Target height in pixels
    pub height: Option<u32>,
    /// Never scale above the source dimensions
    pub without_enlargement: bool,
    /// Background color for flattening (hex RGB, passed to the engine)
    pub background: Option<String>,
    /// Crop-mode spec (passed to the engine)
    pub crop: Option<String>,
    /// Composite alpha over the background color
    pub flatten: bool,
    /// Fit within the target box, preserving aspect ratio
    pub max: bool,
    /// Cover the target box, preserving aspect ratio
    pub min: bool,
}

/// Parse a boolean query flag. Present but "0"/"false" means disabled.
fn flag(value: Option<&String>) -> bool {
    match value {
        Some(v) => v != "0" && v != "false",
        None => false,
    }
}

/// Parse a decimal pixel dimension, treating non-numeric text as absent
fn dimension(key: &str, value: Option<&String>) -> Option<u32> {
    let raw = value?;
    match raw.parse::<u32>() {
        Ok(px) => Some(px),
        Err(_) => {
            tracing::debug!(param = key, value = %raw, "Ignoring non-numeric dimension");
            None
        }
    }
}

impl TransformParams {
    /// Parse from query parameters (e.g., ?width=800&height=600)
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        Self {
            width: dimension("width", query.get("width")),
            height: dimension("height", query.get("height")),
            without_enlargement: flag(query.get("withoutEnlargement")),
            background: query.get("background").cloned(),
            crop: query.get("crop").cloned(),
            flatten: flag(query.get("flatten")),
            max: flag(query.get("max")),
            min: flag(query.get("min")),
        }
    }

    /// Whether a resize was requested at all
    pub fn wants_resize(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }

    /// Encode this parameter set as a cache subdirectory name
    ///
    /// Options are serialized in a fixed name order so that two requests
    /// with the same parameters always land in the same directory, then
    /// every character outside `[A-Za-z0-9_,=:]` is stripped to guarantee
    /// a legal path component.
    pub fn cache_segment(&self) -> String {
        let mut parts = Vec::new();

        if let Some(ref bg) = self.background {
            parts.push(format!("background={}", bg));
        }
        if let Some(ref crop) = self.crop {
            parts.push(format!("crop={}", crop));
        }
        if self.flatten {
            parts.push("flatten=1".to_string());
        }
        if let Some(h) = self.height {
            parts.push(format!("height={}", h));
        }
        if self.max {
            parts.push("max=1".to_string());
        }
        if self.min {
            parts.push("min=1".to_string());
        }
        if let Some(w) = self.width {
            parts.push(format!("width={}", w));
        }
        if self.without_enlargement {
            parts.push("withoutEnlargement=1".to_string());
        }

        if parts.is_empty() {
            return "default".to_string();
        }

        parts
            .join(",")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ',' | '=' | ':'))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_dimensions() {
        let params = TransformParams::from_query(&query(&[("width", "800"), ("height", "600")]));
        assert_eq!(params.width, Some(800));
        assert_eq!(params.height, Some(600));
        assert!(params.wants_resize());
    }

    #[test]
    fn test_parse_non_numeric_dimension_ignored() {
        let params = TransformParams::from_query(&query(&[("width", "banana")]));
        assert_eq!(params.width, None);
        assert!(!params.wants_resize());
    }

    #[test]
    fn test_parse_flags() {
        let params = TransformParams::from_query(&query(&[
            ("width", "100"),
            ("withoutEnlargement", "1"),
            ("flatten", "true"),
            ("max", "0"),
        ]));
        assert!(params.without_enlargement);
        assert!(params.flatten);
        assert!(!params.max);
        assert!(!params.min);
    }

    #[test]
    fn test_unrecognized_keys_ignored() {
        let a = TransformParams::from_query(&query(&[("width", "100")]));
        let b = TransformParams::from_query(&query(&[("width", "100"), ("utm_source", "mail")]));
        assert_eq!(a, b);
        assert_eq!(a.cache_segment(), b.cache_segment());
    }

    #[test]
    fn test_cache_segment_order_independent() {
        let a = TransformParams::from_query(&query(&[("width", "100"), ("height", "50")]));
        let b = TransformParams::from_query(&query(&[("height", "50"), ("width", "100")]));
        assert_eq!(a.cache_segment(), b.cache_segment());
        assert_eq!(a.cache_segment(), "height=50,width=100");
    }

    #[test]
    fn test_cache_segment_distinct_for_distinct_sets() {
        let a = TransformParams::from_query(&query(&[("width", "100")]));
        let b = TransformParams::from_query(&query(&[("width", "100"), ("flatten", "1")]));
        let c = TransformParams::from_query(&query(&[("width", "101")]));
        assert_ne!(a.cache_segment(), b.cache_segment());
        assert_ne!(a.cache_segment(), c.cache_segment());
    }

    #[test]
    fn test_cache_segment_strips_unsafe_characters() {
        let params = TransformParams::from_query(&query(&[
            ("width", "100"),
            ("background", "#aa/bb..cc"),
        ]));
        let segment = params.cache_segment();
        assert_eq!(segment, "background=aabbcc,width=100");
        assert!(!segment.contains('/'));
        assert!(!segment.contains('.'));
    }

    #[test]
    fn test_cache_segment_empty_set() {
        assert_eq!(TransformParams::default().cache_segment(), "default");
    }
}
