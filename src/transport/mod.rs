//! Transport module for Socksrelay
//!
//! Socket tuning and outbound TCP dialing for upstream connections.

mod tcp;

pub use tcp::TcpDialer;

use crate::config::SocksConfig;
use std::time::Duration;
use tokio::net::TcpStream;

/// Socket options for configuring connections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketOpts {
    /// Enable TCP_NODELAY
    pub nodelay: bool,
    /// TCP keepalive timeout
    pub keepalive_secs: Option<u64>,
    /// TCP keepalive interval
    pub keepalive_interval: Option<u64>,
}

impl Default for SocketOpts {
    fn default() -> Self {
        SocketOpts {
            nodelay: true,
            keepalive_secs: Some(20),
            keepalive_interval: Some(8),
        }
    }
}

impl SocketOpts {
    /// Create socket options from SOCKS config
    pub fn from_socks_config(config: &SocksConfig) -> Self {
        SocketOpts {
            nodelay: config.nodelay,
            keepalive_secs: config.keepalive_secs,
            keepalive_interval: config.keepalive_interval,
        }
    }

    /// Apply socket options to a TCP stream
    pub fn apply(&self, stream: &TcpStream) -> std::io::Result<()> {
        stream.set_nodelay(self.nodelay)?;

        if self.keepalive_secs.is_none() && self.keepalive_interval.is_none() {
            return Ok(());
        }

        // Whichever value is unset keeps the system default.
        let mut keepalive = socket2::TcpKeepalive::new();
        if let Some(timeout) = self.keepalive_secs {
            keepalive = keepalive.with_time(Duration::from_secs(timeout));
        }
        if let Some(interval) = self.keepalive_interval {
            keepalive = keepalive.with_interval(Duration::from_secs(interval));
        }
        socket2::SockRef::from(stream).set_tcp_keepalive(&keepalive)?;

        Ok(())
    }

    /// Apply socket options, logging instead of failing
    pub fn hint(&self, stream: &TcpStream) {
        if let Err(e) = self.apply(stream) {
            tracing::warn!("Failed to apply socket options: {}", e);
        }
    }
}
