//! Server configuration types.
//!
//! This module defines the server-level configuration including:
//! - Address and port bindings
//! - Worker thread count
//! - The upstream origin that receives deferred requests
//!
//! Default values are sourced from `crate::constants`.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_THREADS, DEFAULT_UPSTREAM_PORT};

// Default worker thread count
fn default_threads() -> usize {
    DEFAULT_THREADS
}

fn default_upstream_port() -> u16 {
    DEFAULT_UPSTREAM_PORT
}

/// Upstream origin configuration
///
/// Requests the gateway does not terminate itself are proxied here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub address: String,
    #[serde(default = "default_upstream_port")]
    pub port: u16,
    /// Connect with TLS (default: false)
    #[serde(default)]
    pub tls: bool,
    /// SNI hostname for TLS connections (default: the upstream address)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sni: Option<String>,
}

impl UpstreamConfig {
    /// SNI to present when connecting over TLS
    pub fn sni(&self) -> String {
        self.sni.clone().unwrap_or_else(|| self.address.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Number of worker threads (default: 4)
    #[serde(default = "default_threads")]
    pub threads: usize,
    pub upstream: UpstreamConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_deserialize_defaults() {
        let yaml = r#"
address: "127.0.0.1"
port: 8080
upstream:
  address: "origin.internal"
"#;
        let config: ServerConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.threads, DEFAULT_THREADS);
        assert_eq!(config.upstream.port, DEFAULT_UPSTREAM_PORT);
        assert!(!config.upstream.tls);
    }

    #[test]
    fn test_server_config_deserialize_custom() {
        let yaml = r#"
address: "0.0.0.0"
port: 9090
threads: 8
upstream:
  address: "origin.internal"
  port: 8443
  tls: true
  sni: "images.example.com"
"#;
        let config: ServerConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.address, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(config.threads, 8);
        assert_eq!(config.upstream.port, 8443);
        assert!(config.upstream.tls);
        assert_eq!(config.upstream.sni(), "images.example.com");
    }

    #[test]
    fn test_upstream_sni_falls_back_to_address() {
        let yaml = r#"
address: "origin.internal"
port: 8443
tls: true
"#;
        let config: UpstreamConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.sni(), "origin.internal");
    }
}
