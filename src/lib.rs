//! # Socksrelay - Minimal SOCKS5 CONNECT Proxy
//!
//! Socksrelay accepts SOCKS5 clients on a local TCP listener, negotiates the
//! "no authentication" method, dials the requested IPv4 or domain target and
//! relays bytes in both directions until either side closes.
//!
//! ## Features
//!
//! - **CONNECT only**: BIND and UDP ASSOCIATE are answered with
//!   "command not supported"
//! - **IPv4 and domain targets**: IPv6 targets are answered with
//!   "address type not supported"
//! - **Joint teardown**: when either relay direction ends, both sockets close
//! - **Isolated sessions**: one task per client, failures never stop the listener
//!
//! ## Usage
//!
//! ```rust,ignore
//! use socksrelay::config::load_config;
//! use socksrelay::server::Server;
//! use tokio::sync::broadcast;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config("config.toml")?;
//!     let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
//!
//!     Server::bind(&config.server).await?.run(shutdown_rx).await;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! SOCKS5 Client -> Socksrelay -> Target
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod server;
pub mod socks;
pub mod transport;

// Re-export commonly used items
pub use config::{load_config, Config};
pub use error::{ProxyError, Socks5Error, Socks5ReplyCode};
pub use server::Server;

/// Version of the Socksrelay library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the application
pub const NAME: &str = env!("CARGO_PKG_NAME");
