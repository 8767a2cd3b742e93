//! Server configuration types
//!
//! Defines the main configuration structures for the Socksrelay server.

use crate::error::ProxyError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Default listen address
fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

/// Root configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ProxyError> {
        self.server.validate()
    }
}

/// Server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address the SOCKS5 listener binds to (e.g., "127.0.0.1:1080")
    #[serde(default = "default_listen")]
    pub listen: String,

    /// SOCKS5 session configuration
    #[serde(default)]
    pub socks: SocksConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            socks: SocksConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ProxyError> {
        if !is_listen_addr(&self.listen) {
            return Err(ProxyError::Config(format!(
                "invalid listen address {:?}: expected host:port",
                self.listen
            )));
        }
        self.socks.validate()
    }
}

/// Socket address, or a host name with a numeric port for the listener to resolve
fn is_listen_addr(listen: &str) -> bool {
    if listen.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match listen.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty() && !host.contains(':') && port.parse::<u16>().is_ok()
        }
        None => false,
    }
}

/// Default keepalive seconds
fn default_keepalive_secs() -> Option<u64> {
    Some(20)
}

/// Default keepalive interval
fn default_keepalive_interval() -> Option<u64> {
    Some(8)
}

fn default_true() -> bool {
    true
}

/// SOCKS5 session configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SocksConfig {
    /// Upstream connect timeout in seconds; unset means no explicit timeout
    #[serde(default)]
    pub connect_timeout: Option<u64>,

    /// Enable TCP_NODELAY on client and upstream sockets
    #[serde(default = "default_true")]
    pub nodelay: bool,

    /// TCP keepalive timeout in seconds
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: Option<u64>,

    /// TCP keepalive interval in seconds
    #[serde(default = "default_keepalive_interval")]
    pub keepalive_interval: Option<u64>,
}

impl Default for SocksConfig {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            nodelay: true,
            keepalive_secs: default_keepalive_secs(),
            keepalive_interval: default_keepalive_interval(),
        }
    }
}

impl SocksConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ProxyError> {
        if self.connect_timeout == Some(0) {
            return Err(ProxyError::Config(
                "connect_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socks_config_default() {
        let config = SocksConfig::default();
        assert_eq!(config.connect_timeout, None);
        assert!(config.nodelay);
        assert_eq!(config.keepalive_secs, Some(20));
        assert_eq!(config.keepalive_interval, Some(8));
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.listen, "127.0.0.1:8080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_config_invalid_listen() {
        let config = ServerConfig {
            listen: "not-an-address".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ProxyError::Config(_)));
    }

    #[test]
    fn test_server_config_host_name_listen() {
        for listen in ["localhost:1080", "proxy.internal:8080", "[::1]:1080", "0.0.0.0:0"] {
            let config = ServerConfig {
                listen: listen.to_string(),
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "{} should be accepted", listen);
        }

        for listen in ["localhost", ":1080", "localhost:http", "localhost:70000", "::1:1080"] {
            let config = ServerConfig {
                listen: listen.to_string(),
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{} should be rejected", listen);
        }
    }

    #[test]
    fn test_socks_config_zero_timeout() {
        let config = SocksConfig {
            connect_timeout: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SocksConfig {
            connect_timeout: Some(5),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
