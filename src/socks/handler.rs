//! SOCKS5 session handler
//!
//! Drives one client connection through
//! Greeting -> Authenticated -> Connected -> Relaying -> Closed.
//! Both sockets are owned by the session, so every exit path closes them.

use crate::error::Socks5Error;
use crate::socks::auth::authenticate;
use crate::socks::command::{build_reply, parse_command, send_io_error, send_success};
use crate::socks::tcp_relay::{relay_tcp, RelayStats};
use crate::socks::types::TargetAddr;
use crate::transport::TcpDialer;
use anyhow::{Context, Result};
use std::fmt;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info};

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the client greeting
    Greeting,
    /// Method selected, waiting for the connect request
    Authenticated,
    /// Upstream dialed
    Connected,
    /// Copying bytes in both directions
    Relaying,
    /// Finished, normally or not
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Greeting => "greeting",
            SessionState::Authenticated => "authenticated",
            SessionState::Connected => "connected",
            SessionState::Relaying => "relaying",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// One proxied client connection
pub struct Session<S> {
    /// Client stream. Bytes the client pipelines after its connect request
    /// stay in the buffer and are relayed first.
    client: BufReader<S>,
    /// Client address, for logging
    peer: String,
    state: SessionState,
    dialer: TcpDialer,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    /// Create a session over an accepted client stream
    pub fn new(stream: S, peer: impl Into<String>, dialer: TcpDialer) -> Self {
        Session {
            client: BufReader::new(stream),
            peer: peer.into(),
            state: SessionState::Greeting,
            dialer,
        }
    }

    /// Run the session to completion
    ///
    /// Consumes the session; the client and upstream streams are closed
    /// when this returns, whatever the outcome.
    pub async fn run(mut self) -> Result<RelayStats> {
        let (target, upstream) = match self.establish().await {
            Ok(established) => established,
            Err(e) => {
                self.transition(SessionState::Closed);
                return Err(e);
            }
        };

        let Session { client, peer, .. } = self;
        let stats = relay_tcp(client, upstream).await;

        debug!(
            "Session {}: {} -> {}, {} client->upstream {:?} bytes, upstream->client {:?} bytes",
            peer,
            SessionState::Relaying,
            SessionState::Closed,
            target,
            stats.client_to_upstream,
            stats.upstream_to_client
        );

        Ok(stats)
    }

    /// Run both handshakes and dial the target
    async fn establish(&mut self) -> Result<(TargetAddr, TcpStream)> {
        authenticate(&mut self.client)
            .await
            .with_context(|| "Authentication negotiation failed")?;
        self.transition(SessionState::Authenticated);

        let target = self.read_request().await?;
        let upstream = self.connect(&target).await?;

        send_success(&mut self.client)
            .await
            .with_context(|| "Failed to send connect reply")?;
        self.transition(SessionState::Relaying);

        info!("SOCKS5 tunnel established {} <-> {}", self.peer, target);

        Ok((target, upstream))
    }

    async fn read_request(&mut self) -> Result<TargetAddr> {
        match parse_command(&mut self.client).await {
            Ok(target) => {
                info!("SOCKS5 CONNECT request from {} to {}", self.peer, target);
                Ok(target)
            }
            Err(e) => {
                self.reply_failure(&e).await;
                Err(e).with_context(|| "Failed to parse SOCKS5 command")
            }
        }
    }

    async fn connect(&mut self, target: &TargetAddr) -> Result<TcpStream> {
        match self.dialer.connect(target).await {
            Ok(upstream) => {
                self.transition(SessionState::Connected);
                Ok(upstream)
            }
            Err(e) => {
                if let Err(reply_err) = send_io_error(&mut self.client, &e).await {
                    debug!("Failed to send failure reply to {}: {}", self.peer, reply_err);
                }
                Err(e).with_context(|| format!("Failed to connect to {}", target))
            }
        }
    }

    /// Tell the client why its request is refused, where a reply code applies
    async fn reply_failure(&mut self, err: &Socks5Error) {
        if let Some(code) = err.reply_code() {
            if let Err(reply_err) = build_reply(&mut self.client, code).await {
                debug!("Failed to send failure reply to {}: {}", self.peer, reply_err);
            }
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!("Session {}: {} -> {}", self.peer, self.state, next);
        self.state = next;
    }
}
