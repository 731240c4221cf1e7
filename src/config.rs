//! Session configuration
//!
//! The four values the core contract requires (local node, remote node,
//! host, port) plus the tunables the protocol fixes per session: the
//! requested buffer size sent at sign-in, the code page name, and the
//! bounds on the link-level wait. Serializable to JSON for profile files.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NjeError, Result};

/// Default NJE-over-TCP port
pub const DEFAULT_PORT: u16 = 175;
/// Buffer size requested in the sign-in record
pub const DEFAULT_BUFFER_SIZE: u16 = 8192;

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_buffer_size() -> u16 {
    DEFAULT_BUFFER_SIZE
}

fn default_codepage() -> String {
    "EBCDIC-US".to_string()
}

fn default_link_timeout_ms() -> u64 {
    10_000
}

fn default_poll_interval_ms() -> u64 {
    100
}

/// Everything a session needs to reach and identify itself to a peer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// Our node name, at most 8 characters
    pub local_node: String,
    /// The peer's node name, at most 8 characters
    pub remote_node: String,
    /// Peer host name or dotted-quad address
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Host string resolved into the OPEN record's sender address;
    /// absent means the sender address is sent as zero
    #[serde(default)]
    pub local_host: Option<String>,
    /// Buffer size requested at sign-in
    #[serde(default = "default_buffer_size")]
    pub buffer_size: u16,
    /// Name of the code page used for all text fields
    #[serde(default = "default_codepage")]
    pub codepage: String,
    /// Upper bound on the link-level wait during connect
    #[serde(default = "default_link_timeout_ms")]
    pub link_timeout_ms: u64,
    /// Fixed interval between availability checks during that wait
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl SessionConfig {
    pub fn new(local_node: &str, remote_node: &str, host: &str, port: u16) -> Self {
        Self {
            local_node: local_node.to_string(),
            remote_node: remote_node.to_string(),
            host: host.to_string(),
            port,
            local_host: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            codepage: default_codepage(),
            link_timeout_ms: default_link_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }

    /// Checks the constraints the wire format imposes
    pub fn validate(&self) -> Result<()> {
        validate_node_name("local_node", &self.local_node)?;
        validate_node_name("remote_node", &self.remote_node)?;
        if self.host.is_empty() {
            return Err(NjeError::Config {
                parameter: "host",
                reason: "must not be empty".to_string(),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(NjeError::Config {
                parameter: "poll_interval_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Loads and validates a JSON profile
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: SessionConfig = serde_json::from_str(&text).map_err(|e| NjeError::Config {
            parameter: "profile",
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the profile as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = serde_json::to_string_pretty(self).map_err(|e| NjeError::Config {
            parameter: "profile",
            reason: e.to_string(),
        })?;
        fs::write(path, text)?;
        Ok(())
    }
}

fn validate_node_name(parameter: &'static str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(NjeError::Config {
            parameter,
            reason: "must not be empty".to_string(),
        });
    }
    if name.chars().count() > 8 {
        return Err(NjeError::Config {
            parameter,
            reason: format!("'{}' exceeds the 8-character node name limit", name),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::new("NETNJE", "FRYJLX1", "nje.example.org", DEFAULT_PORT);
        assert_eq!(config.port, 175);
        assert_eq!(config.buffer_size, 8192);
        assert_eq!(config.codepage, "EBCDIC-US");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_node_name_length_enforced() {
        let config = SessionConfig::new("TOOLONGNAME", "OK", "host", 175);
        assert!(matches!(
            config.validate(),
            Err(NjeError::Config { parameter: "local_node", .. })
        ));
    }

    #[test]
    fn test_empty_fields_rejected() {
        let config = SessionConfig::new("A", "", "host", 175);
        assert!(config.validate().is_err());
        let config = SessionConfig::new("A", "B", "", 175);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = SessionConfig::new("NETNJE", "FRYJLX1", "nje.example.org", 1175);
        let json = serde_json::to_string(&config).unwrap();
        let back: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_profile_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let config = SessionConfig::new("NETNJE", "FRYJLX1", "nje.example.org", 175);
        config.save(&path).unwrap();
        let loaded = SessionConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_profile_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        // Node name too long: load must fail validation, not just parsing
        let mut config = SessionConfig::new("NETNJE", "FRYJLX1", "host", 175);
        config.local_node = "WAYTOOLONGNAME".to_string();
        fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
        assert!(matches!(
            SessionConfig::load(&path),
            Err(NjeError::Config { parameter: "local_node", .. })
        ));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{"local_node":"A","remote_node":"B","host":"h"}"#;
        let config: SessionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
        assert_eq!(config.link_timeout_ms, 10_000);
        assert!(config.local_host.is_none());
    }
}
