//! SOCKS5 authentication module
//!
//! Handles the greeting and method selection. Only "no authentication" is
//! offered, whatever methods the client lists.

use super::consts::*;
use super::read_field;
use super::types::Greeting;
use crate::error::Socks5Error;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

/// Parse the client greeting
///
/// # SOCKS5 Greeting Format
///
/// ```text
/// +----+----------+----------+
/// |VER | NMETHODS | METHODS  |
/// +----+----------+----------+
/// | 1  |    1     | 1 to 255 |
/// +----+----------+----------+
/// ```
pub async fn parse_greeting<S>(stream: &mut S) -> Result<Greeting, Socks5Error>
where
    S: AsyncRead + Unpin,
{
    let [version, num_methods] = read_field(stream, [0u8; 2], "greeting header").await?;

    if version != SOCKS5_VERSION {
        return Err(Socks5Error::UnsupportedVersion(version));
    }

    let methods = read_field(stream, vec![0u8; num_methods as usize], "methods").await?;

    Ok(Greeting { methods })
}

/// Send the method selection reply: always `[VER, NO AUTH]`
pub async fn write_method_selection<S>(stream: &mut S) -> Result<(), Socks5Error>
where
    S: AsyncWrite + Unpin,
{
    stream
        .write_all(&[SOCKS5_VERSION, SOCKS5_AUTH_METHOD_NONE])
        .await?;
    stream.flush().await?;
    Ok(())
}

/// Perform the whole greeting exchange
///
/// Returns the greeting so callers can log what the client offered.
pub async fn authenticate<S>(stream: &mut S) -> Result<Greeting, Socks5Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let greeting = parse_greeting(stream).await?;
    tracing::debug!("Methods offered by client: {:?}", greeting.methods);

    if !greeting.methods.contains(&SOCKS5_AUTH_METHOD_NONE) {
        tracing::debug!("Client did not offer NO AUTH, selecting it anyway");
    }

    write_method_selection(stream).await?;
    Ok(greeting)
}
