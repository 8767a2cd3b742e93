//! SOCKS5 type definitions
//!
//! Defines the core types used in SOCKS5 protocol handling.

use std::fmt;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Methods offered by the client in its greeting
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Greeting {
    /// Method identifiers, in the order the client sent them
    pub methods: Vec<u8>,
}

/// Target address for SOCKS5 requests
///
/// Represents the destination address in a SOCKS5 request.
/// Can be an IP address or a domain name; domain names stay unresolved
/// until the session dials them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetAddr {
    /// IP address with port
    Ip(SocketAddr),
    /// Domain name with port
    Domain(String, u16),
}

impl TargetAddr {
    /// Create a new TargetAddr from an IPv4 address and port
    pub fn ipv4(ip: Ipv4Addr, port: u16) -> Self {
        TargetAddr::Ip(SocketAddr::new(IpAddr::V4(ip), port))
    }

    /// Create a new TargetAddr from a domain name and port
    pub fn domain(domain: String, port: u16) -> Self {
        TargetAddr::Domain(domain, port)
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        match self {
            TargetAddr::Ip(addr) => addr.port(),
            TargetAddr::Domain(_, port) => *port,
        }
    }

    /// Resolve the address to the socket addresses worth dialing
    ///
    /// For IP addresses, this returns immediately.
    /// For domain names, this performs DNS resolution and keeps every
    /// record in resolver order. The list is never empty.
    pub async fn resolve(&self) -> io::Result<Vec<SocketAddr>> {
        match self {
            TargetAddr::Ip(addr) => Ok(vec![*addr]),
            TargetAddr::Domain(domain, port) => {
                let addrs: Vec<SocketAddr> =
                    tokio::net::lookup_host((domain.as_str(), *port)).await?.collect();
                if addrs.is_empty() {
                    return Err(io::Error::new(
                        io::ErrorKind::AddrNotAvailable,
                        format!("No addresses found for domain: {}", domain),
                    ));
                }
                Ok(addrs)
            }
        }
    }
}

impl fmt::Display for TargetAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetAddr::Ip(addr) => write!(f, "{}", addr),
            TargetAddr::Domain(domain, port) => write!(f, "{}:{}", domain, port),
        }
    }
}
