//! TCP relay for SOCKS5 CONNECT command
//!
//! Copies bytes client -> upstream and upstream -> client on two spawned
//! tasks. Whichever direction stops first cancels a shared token; the
//! coordinator then aborts the other task, which drops both streams.

use std::io;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Bytes moved by each relay direction
///
/// A direction that was cut off when the other one finished, or that
/// stopped on an I/O error, reports `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Bytes copied from the client to the upstream
    pub client_to_upstream: Option<u64>,
    /// Bytes copied from the upstream to the client
    pub upstream_to_client: Option<u64>,
}

/// Relay data bidirectionally between two streams
///
/// Returns once either direction reaches EOF or fails. Both streams are
/// dropped, and therefore closed, before this function returns. Copy errors
/// are the normal way a relay ends and are only logged.
pub async fn relay_tcp<A, B>(client: A, upstream: B) -> RelayStats
where
    A: AsyncRead + AsyncWrite + Send + 'static,
    B: AsyncRead + AsyncWrite + Send + 'static,
{
    let (client_read, client_write) = tokio::io::split(client);
    let (upstream_read, upstream_write) = tokio::io::split(upstream);

    let done = CancellationToken::new();

    let uplink = spawn_copy("client->upstream", client_read, upstream_write, done.clone());
    let downlink = spawn_copy("upstream->client", upstream_read, client_write, done.clone());

    done.cancelled().await;

    uplink.abort();
    downlink.abort();

    RelayStats {
        client_to_upstream: bytes_copied(uplink.await),
        upstream_to_client: bytes_copied(downlink.await),
    }
}

fn spawn_copy<R, W>(
    direction: &'static str,
    mut reader: R,
    mut writer: W,
    done: CancellationToken,
) -> JoinHandle<io::Result<u64>>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        // Cancels on every exit, panics included.
        let _guard = done.drop_guard();

        let result = tokio::io::copy(&mut reader, &mut writer).await;
        match &result {
            Ok(bytes) => debug!("{} finished: {} bytes", direction, bytes),
            Err(e) => debug!("{} error: {}", direction, e),
        }
        result
    })
}

fn bytes_copied(joined: Result<io::Result<u64>, JoinError>) -> Option<u64> {
    joined.ok().and_then(Result::ok)
}
