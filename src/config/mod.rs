//! Configuration loading and validation.
//!
//! Configuration is read from a YAML file with two sections:
//! - `server`: listen address and the upstream origin that receives
//!   requests this gateway does not handle itself
//! - `mount`: the static root, cache root, and static-fallback flag

pub mod mount;
pub mod server;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use mount::MountConfig;
pub use server::{ServerConfig, UpstreamConfig};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub mount: MountConfig,
}

impl Config {
    /// Load and validate configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }
        if self.server.upstream.port == 0 {
            return Err(ConfigError::Invalid(
                "server.upstream.port must be non-zero".into(),
            ));
        }
        if self.mount.static_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "mount.static_dir must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn minimal_yaml() -> &'static str {
        r#"
server:
  address: "127.0.0.1"
  port: 8080
  upstream:
    address: "origin.internal"
    port: 9000
mount:
  static_dir: "/srv/static"
"#
    }

    #[test]
    fn test_config_deserialize_minimal() {
        let config: Config = serde_yaml::from_str(minimal_yaml()).unwrap();

        assert_eq!(config.server.address, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.mount.static_dir, PathBuf::from("/srv/static"));
        assert!(!config.mount.serve_static);
        config.validate().unwrap();
    }

    #[test]
    fn test_config_rejects_zero_port() {
        let yaml = r#"
server:
  address: "127.0.0.1"
  port: 0
  upstream:
    address: "origin.internal"
    port: 9000
mount:
  static_dir: "/srv/static"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_empty_static_dir() {
        let yaml = r#"
server:
  address: "127.0.0.1"
  port: 8080
  upstream:
    address: "origin.internal"
    port: 9000
mount:
  static_dir: ""
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }
}
