//! SOCKS5 command parsing module
//!
//! Handles parsing SOCKS5 connect requests and building replies.

mod parser;
mod reply;

pub use parser::parse_command;
pub use reply::{build_reply, send_io_error, send_success};
