//! Server configuration.

use std::net::{Ipv4Addr, SocketAddrV4};
use std::path::Path;

use gobang_session::DEFAULT_NAME;
use serde::{Deserialize, Serialize};

use crate::GobangError;

/// Port the server listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 8848;

/// Settings for a [`GobangServer`](crate::GobangServer).
///
/// Every field has a default, so a JSON file only needs the keys it wants
/// to change:
///
/// ```json
/// { "bind_addr": "127.0.0.1:9000" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// IPv4 address and port to listen on.
    pub bind_addr: SocketAddrV4,

    /// Display name of a session that has not enrolled.
    pub default_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, DEFAULT_PORT),
            default_name: DEFAULT_NAME.to_string(),
        }
    }
}

impl ServerConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, GobangError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GobangError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| GobangError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8848");
        assert_eq!(config.default_name, "Player Unknown");
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = ServerConfig::from_json(r#"{ "bind_addr": "127.0.0.1:9000" }"#).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse::<SocketAddrV4>().unwrap());
        assert_eq!(config.default_name, "Player Unknown");
    }

    #[test]
    fn test_from_json_round_trip() {
        let config = ServerConfig {
            bind_addr: "10.0.0.1:1234".parse().unwrap(),
            default_name: "Guest".into(),
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ServerConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_from_json_rejects_ipv6_and_garbage() {
        assert!(matches!(
            ServerConfig::from_json(r#"{ "bind_addr": "[::1]:8848" }"#),
            Err(GobangError::ConfigParse(_))
        ));
        assert!(matches!(
            ServerConfig::from_json("not json"),
            Err(GobangError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ServerConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, GobangError::ConfigRead { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
