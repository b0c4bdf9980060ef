//! Gateway utility functions.
//!
//! This module contains helper functions for request processing:
//! - Query parameter extraction from Pingora requests
//! - Percent-decoding of request paths
//! - Resize exemption by file type
//! - Content-Type selection for file responses

use std::collections::HashMap;
use std::path::Path;

use pingora_http::RequestHeader;

use crate::constants::{FALLBACK_CONTENT_TYPE, RESIZE_EXEMPT_SUFFIX};

/// Extract query parameters from URI.
///
/// Parses the query string from the request URI and returns key-value pairs.
/// Values are URL-decoded.
pub fn extract_query_params(req: &RequestHeader) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(query) = req.uri.query() {
        for pair in query.split('&') {
            if let Some((key, value)) = pair.split_once('=') {
                params.insert(
                    key.to_string(),
                    urlencoding::decode(value).unwrap_or_default().to_string(),
                );
            }
        }
    }
    params
}

/// Percent-decode a request path, falling back to the raw path on invalid
/// escape sequences
pub fn decode_path(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Whether the path is exempt from resizing regardless of parameters
pub fn is_resize_exempt(path: &str) -> bool {
    path.to_ascii_lowercase().ends_with(RESIZE_EXEMPT_SUFFIX)
}

/// Content-Type for a file path, chosen by extension
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("avif") => "image/avif",
        Some("svg") => "image/svg+xml",
        _ => FALLBACK_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/img/a%20b.png"), "/img/a b.png");
        assert_eq!(decode_path("/img/plain.png"), "/img/plain.png");
    }

    #[test]
    fn test_resize_exemption_is_case_insensitive() {
        assert!(is_resize_exempt("/img/logo.svg"));
        assert!(is_resize_exempt("/img/logo.SVG"));
        assert!(!is_resize_exempt("/img/logo.png"));
        assert!(!is_resize_exempt("/img/svg"));
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.JPEG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.png")), "image/png");
        assert_eq!(content_type_for(Path::new("a.webp")), "image/webp");
        assert_eq!(content_type_for(Path::new("a.svg")), "image/svg+xml");
        assert_eq!(content_type_for(Path::new("a.bin")), FALLBACK_CONTENT_TYPE);
        assert_eq!(content_type_for(Path::new("noext")), FALLBACK_CONTENT_TYPE);
    }
}
