//! SOCKS5 module for Socksrelay
//!
//! This module implements the CONNECT subset of SOCKS5: frame codec,
//! per-connection session handler and the bidirectional relay.

mod auth;
mod command;
mod consts;
mod handler;
mod tcp_relay;
mod types;

pub use auth::{authenticate, parse_greeting, write_method_selection};
pub use command::{build_reply, parse_command, send_io_error, send_success};
pub use consts::*;
pub use handler::{Session, SessionState};
pub use tcp_relay::{relay_tcp, RelayStats};
pub use types::{Greeting, TargetAddr};

use crate::error::Socks5Error;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Fill `buf` from the stream, reporting a short read as a truncated frame
async fn read_field<S, B>(stream: &mut S, mut buf: B, field: &'static str) -> Result<B, Socks5Error>
where
    S: AsyncRead + Unpin,
    B: AsMut<[u8]>,
{
    match stream.read_exact(buf.as_mut()).await {
        Ok(_) => Ok(buf),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(Socks5Error::Truncated(field)),
        Err(e) => Err(Socks5Error::Io(e)),
    }
}
