//! Test utilities and mocks for Socksrelay
//!
//! This module provides common test utilities used across integration tests.

use socksrelay::config::{ServerConfig, SocksConfig};
use socksrelay::server::Server;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;

/// Create a test TCP listener on an available port
pub async fn create_test_listener() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// Start an echo server accepting any number of connections
pub async fn start_echo_server() -> SocketAddr {
    let (listener, addr) = create_test_listener().await;
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let (mut r, mut w) = stream.split();
                let _ = tokio::io::copy(&mut r, &mut w).await;
            });
        }
    });
    addr
}

/// Start a server that writes `payload` to the first connection and closes it
pub async fn start_oneshot_server(payload: &'static [u8]) -> SocketAddr {
    let (listener, addr) = create_test_listener().await;
    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let _ = stream.write_all(payload).await;
        }
    });
    addr
}

/// Start a proxy on an ephemeral port
///
/// The returned sender keeps the proxy alive; dropping it stops the listener.
pub async fn start_proxy() -> (SocketAddr, broadcast::Sender<bool>) {
    let config = ServerConfig {
        listen: "127.0.0.1:0".to_string(),
        socks: SocksConfig::default(),
    };
    let server = Server::bind(&config).await.unwrap();
    let addr = server.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(server.run(shutdown_rx));

    (addr, shutdown_tx)
}

/// Run the greeting and the connect request, returning the reply frame
pub async fn handshake(stream: &mut TcpStream, request: &[u8]) -> [u8; 10] {
    stream
        .write_all(&socks5_mock::create_auth_request_no_auth())
        .await
        .unwrap();

    let mut selection = [0u8; 2];
    stream.read_exact(&mut selection).await.unwrap();
    assert_eq!(selection, [0x05, 0x00]);

    stream.write_all(request).await.unwrap();

    let mut reply = [0u8; 10];
    stream.read_exact(&mut reply).await.unwrap();
    reply
}

/// Mock SOCKS5 handshake data
pub mod socks5_mock {
    use socksrelay::socks::*;

    /// Create a no-auth method selection request
    pub fn create_auth_request_no_auth() -> Vec<u8> {
        vec![SOCKS5_VERSION, 1, SOCKS5_AUTH_METHOD_NONE]
    }

    /// Create a connect command to IPv4 address
    pub fn create_connect_ipv4(ip: [u8; 4], port: u16) -> Vec<u8> {
        let mut cmd = vec![
            SOCKS5_VERSION,
            SOCKS5_CMD_TCP_CONNECT,
            SOCKS5_RESERVED,
            SOCKS5_ADDR_TYPE_IPV4,
        ];
        cmd.extend_from_slice(&ip);
        cmd.extend_from_slice(&port.to_be_bytes());
        cmd
    }

    /// Create a connect command to domain
    pub fn create_connect_domain(domain: &str, port: u16) -> Vec<u8> {
        let mut cmd = vec![
            SOCKS5_VERSION,
            SOCKS5_CMD_TCP_CONNECT,
            SOCKS5_RESERVED,
            SOCKS5_ADDR_TYPE_DOMAIN,
            domain.len() as u8,
        ];
        cmd.extend_from_slice(domain.as_bytes());
        cmd.extend_from_slice(&port.to_be_bytes());
        cmd
    }

    /// Create a connect command for a socket address on 127.0.0.1
    pub fn create_connect_local(addr: std::net::SocketAddr) -> Vec<u8> {
        create_connect_ipv4([127, 0, 0, 1], addr.port())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_test_listener() {
        let (listener, addr) = create_test_listener().await;
        assert!(addr.port() > 0);
        drop(listener);
    }

    #[test]
    fn test_socks5_mock_auth_request() {
        let request = socks5_mock::create_auth_request_no_auth();
        assert_eq!(request[0], 5); // SOCKS5 version
        assert_eq!(request[1], 1); // 1 method
        assert_eq!(request[2], 0); // NO AUTH
    }

    #[test]
    fn test_socks5_mock_connect_ipv4() {
        let cmd = socks5_mock::create_connect_ipv4([192, 168, 1, 1], 8080);
        assert_eq!(cmd[0], 5); // SOCKS5 version
        assert_eq!(cmd[1], 1); // CONNECT
        assert_eq!(cmd[3], 1); // IPv4
        assert_eq!(&cmd[4..8], &[192, 168, 1, 1]);
    }

    #[test]
    fn test_socks5_mock_connect_domain() {
        let cmd = socks5_mock::create_connect_domain("example.com", 443);
        assert_eq!(cmd[3], 3); // DOMAIN
        assert_eq!(cmd[4], 11);
        assert_eq!(&cmd[5..16], b"example.com");
        assert_eq!(&cmd[16..], &[0x01, 0xBB]);
    }
}
