//! SOCKS5 listener
//!
//! Accepts client connections and runs one [`Session`] task per
//! connection. A failing session is logged and never reaches the accept
//! loop.

use crate::config::ServerConfig;
use crate::error::{ProxyError, Socks5Error};
use crate::socks::Session;
use crate::transport::{SocketOpts, TcpDialer};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, error, info, info_span, warn, Instrument, Level};

/// Pause after a failed accept, so a persistent error such as fd
/// exhaustion does not spin the loop
const ACCEPT_ERROR_PAUSE: Duration = Duration::from_millis(100);

/// Bound SOCKS5 server
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    socket_opts: SocketOpts,
    dialer: TcpDialer,
}

impl Server {
    /// Bind the listening socket described by the configuration
    pub async fn bind(config: &ServerConfig) -> Result<Self, ProxyError> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen).await?;

        Ok(Server {
            listener,
            socket_opts: SocketOpts::from_socks_config(&config.socks),
            dialer: TcpDialer::new(&config.socks),
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr, ProxyError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until shutdown
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<bool>) {
        match self.listener.local_addr() {
            Ok(addr) => info!("Listening for SOCKS5 connections on {}", addr),
            Err(e) => warn!("Listening for SOCKS5 connections (unknown address: {})", e),
        }

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => self.dispatch(stream, peer),
                        Err(e) => {
                            warn!("Accept failed: {}", e);
                            tokio::time::sleep(ACCEPT_ERROR_PAUSE).await;
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal received, stopping listener");
                    break;
                }
            }
        }
    }

    fn dispatch(&self, stream: TcpStream, peer: SocketAddr) {
        self.socket_opts.hint(&stream);

        let session = Session::new(stream, peer.to_string(), self.dialer.clone());
        let span = info_span!("session", peer = %peer);

        tokio::spawn(
            async move {
                debug!("Accepted connection");
                match session.run().await {
                    Ok(_) => debug!("Session closed"),
                    Err(e) => {
                        let level = failure_level(&e);
                        if level == Level::DEBUG {
                            debug!("Client {} hung up during handshake: {:#}", peer, e);
                        } else if level == Level::WARN {
                            warn!("Client {} sent a malformed handshake: {:#}", peer, e);
                        } else {
                            error!("Client {} session failed: {:#}", peer, e);
                        }
                    }
                }
            }
            .instrument(span),
        );
    }
}

/// Severity of a failed session
///
/// Clients hanging up mid-handshake are routine and only logged at debug.
fn failure_level(err: &anyhow::Error) -> Level {
    match err.downcast_ref::<Socks5Error>() {
        Some(Socks5Error::Truncated(_)) => Level::DEBUG,
        Some(e) if e.is_protocol_error() => Level::WARN,
        _ => Level::ERROR,
    }
}
