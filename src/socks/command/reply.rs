//! SOCKS5 reply builder
//!
//! Constructs SOCKS5 connect replies. The bound address is always
//! reported as `0.0.0.0:0`.

use crate::error::{Socks5Error, Socks5ReplyCode};
use crate::socks::consts::*;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Build and send a SOCKS5 reply
///
/// # SOCKS5 Reply Format
///
/// ```text
/// +----+-----+-------+------+----------+----------+
/// |VER | REP |  RSV  | ATYP | BND.ADDR | BND.PORT |
/// +----+-----+-------+------+----------+----------+
/// | 1  |  1  | X'00' |  1   | Variable |    2     |
/// +----+-----+-------+------+----------+----------+
/// ```
pub async fn build_reply<S>(stream: &mut S, reply_code: Socks5ReplyCode) -> Result<(), Socks5Error>
where
    S: AsyncWrite + Unpin,
{
    let reply = reply_bytes(reply_code);

    stream.write_all(&reply).await?;
    stream.flush().await?;

    Ok(())
}

/// Build a success reply
pub async fn send_success<S>(stream: &mut S) -> Result<(), Socks5Error>
where
    S: AsyncWrite + Unpin,
{
    build_reply(stream, Socks5ReplyCode::Succeeded).await
}

/// Build an error reply from a failed dial
pub async fn send_io_error<S>(stream: &mut S, error: &std::io::Error) -> Result<(), Socks5Error>
where
    S: AsyncWrite + Unpin,
{
    build_reply(stream, Socks5ReplyCode::from(error)).await
}

fn reply_bytes(reply_code: Socks5ReplyCode) -> [u8; SOCKS5_REPLY_LEN] {
    [
        SOCKS5_VERSION,
        reply_code.into(),
        SOCKS5_RESERVED,
        SOCKS5_ADDR_TYPE_IPV4,
        0,
        0,
        0,
        0,
        0,
        0,
    ]
}
