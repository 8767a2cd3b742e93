//! SOCKS5 command parser
//!
//! Parses SOCKS5 connect requests from the client.

use crate::error::Socks5Error;
use crate::socks::consts::*;
use crate::socks::read_field;
use crate::socks::types::TargetAddr;
use std::net::Ipv4Addr;
use tokio::io::AsyncRead;

/// Parse a SOCKS5 connect request from the stream
///
/// # SOCKS5 Request Format
///
/// ```text
/// +----+-----+-------+------+----------+----------+
/// |VER | CMD |  RSV  | ATYP | DST.ADDR | DST.PORT |
/// +----+-----+-------+------+----------+----------+
/// | 1  |  1  | X'00' |  1   | Variable |    2     |
/// +----+-----+-------+------+----------+----------+
/// ```
///
/// Only CONNECT is accepted. Domain names are returned unresolved.
pub async fn parse_command<S>(stream: &mut S) -> Result<TargetAddr, Socks5Error>
where
    S: AsyncRead + Unpin,
{
    // Read: VER CMD RSV ATYP
    let [version, cmd_byte, _reserved, addr_type] =
        read_field(stream, [0u8; 4], "request header").await?;

    if version != SOCKS5_VERSION {
        return Err(Socks5Error::UnsupportedVersion(version));
    }

    if cmd_byte != SOCKS5_CMD_TCP_CONNECT {
        return Err(Socks5Error::CommandNotSupported(cmd_byte));
    }

    let target_addr = parse_address(stream, addr_type).await?;

    tracing::debug!("Parsed SOCKS5 CONNECT to {}", target_addr);

    Ok(target_addr)
}

/// Parse the address portion of a SOCKS5 request
async fn parse_address<S>(stream: &mut S, addr_type: u8) -> Result<TargetAddr, Socks5Error>
where
    S: AsyncRead + Unpin,
{
    match addr_type {
        SOCKS5_ADDR_TYPE_IPV4 => {
            let addr = read_field(stream, [0u8; 4], "ipv4 address").await?;
            let port = read_port(stream).await?;

            Ok(TargetAddr::ipv4(Ipv4Addr::from(addr), port))
        }

        SOCKS5_ADDR_TYPE_DOMAIN => {
            let [domain_len] = read_field(stream, [0u8; 1], "domain length").await?;
            let domain_buf =
                read_field(stream, vec![0u8; domain_len as usize], "domain name").await?;

            if domain_buf.is_empty() {
                return Err(Socks5Error::InvalidDomain("empty domain name".to_string()));
            }
            let domain = String::from_utf8(domain_buf).map_err(|e| {
                Socks5Error::InvalidDomain(String::from_utf8_lossy(e.as_bytes()).into_owned())
            })?;

            let port = read_port(stream).await?;

            Ok(TargetAddr::domain(domain, port))
        }

        SOCKS5_ADDR_TYPE_IPV6 => Err(Socks5Error::AddressTypeNotSupported(addr_type)),

        _ => Err(Socks5Error::InvalidAddressType(addr_type)),
    }
}

async fn read_port<S>(stream: &mut S) -> Result<u16, Socks5Error>
where
    S: AsyncRead + Unpin,
{
    let port_buf = read_field(stream, [0u8; 2], "port").await?;
    Ok(u16::from_be_bytes(port_buf))
}
