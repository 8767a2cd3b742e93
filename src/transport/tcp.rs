//! TCP dialer
//!
//! Opens plain TCP connections to SOCKS5 targets.

use super::SocketOpts;
use crate::config::SocksConfig;
use crate::socks::TargetAddr;
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;

/// Dialer for upstream connections
///
/// Without a connect timeout the dial is bounded only by the operating
/// system's own TCP connect timeout.
#[derive(Debug, Clone, Default)]
pub struct TcpDialer {
    /// Socket options to apply to connections
    socket_opts: SocketOpts,
    /// Connection timeout
    connect_timeout: Option<Duration>,
}

impl TcpDialer {
    /// Create a dialer from SOCKS configuration
    pub fn new(config: &SocksConfig) -> Self {
        TcpDialer {
            socket_opts: SocketOpts::from_socks_config(config),
            connect_timeout: config.connect_timeout.map(Duration::from_secs),
        }
    }

    /// Resolve and connect to the target
    ///
    /// Every resolved address is tried in order until one accepts; the
    /// last failure is returned otherwise. Errors stay as [`io::Error`] so
    /// the caller can pick a reply code from the error kind.
    pub async fn connect(&self, target: &TargetAddr) -> io::Result<TcpStream> {
        let dial = self.dial(target);
        let stream = match self.connect_timeout {
            Some(timeout) => tokio::time::timeout(timeout, dial).await.map_err(|_| {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("Connection timeout to {}", target),
                )
            })??,
            None => dial.await?,
        };

        self.socket_opts.hint(&stream);

        Ok(stream)
    }

    async fn dial(&self, target: &TargetAddr) -> io::Result<TcpStream> {
        let mut last_err = None;

        for addr in target.resolve().await? {
            match TcpStream::connect(addr).await {
                Ok(stream) => {
                    tracing::debug!("TCP connection established to {} ({})", target, addr);
                    return Ok(stream);
                }
                Err(e) => {
                    tracing::debug!("Connect to {} ({}) failed: {}", target, addr, e);
                    last_err = Some(e);
                }
            }
        }

        // resolve() never returns an empty list
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("No addresses to connect to for {}", target),
            )
        }))
    }
}
