//! Error types for Socksrelay
//!
//! This module defines all custom error types used throughout the application.

use std::io;
use thiserror::Error;

/// Main error type for Socksrelay operations
#[derive(Error, Debug)]
pub enum ProxyError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// SOCKS5 specific errors
///
/// Raised by the frame codec. [`Socks5Error::is_protocol_error`] groups the
/// variants that mean the peer sent a malformed frame.
#[derive(Error, Debug)]
pub enum Socks5Error {
    /// Unsupported SOCKS version
    #[error("Unsupported SOCKS version: {0}")]
    UnsupportedVersion(u8),

    /// Stream ended in the middle of a frame
    #[error("Truncated frame while reading {0}")]
    Truncated(&'static str),

    /// Invalid domain name
    #[error("Invalid domain name: {0}")]
    InvalidDomain(String),

    /// Command not supported
    #[error("Command not supported: {0}")]
    CommandNotSupported(u8),

    /// Address type known to SOCKS5 but not implemented here
    #[error("Address type not supported: {0}")]
    AddressTypeNotSupported(u8),

    /// Address type not defined by SOCKS5
    #[error("Invalid address type: {0}")]
    InvalidAddressType(u8),

    /// IO error while reading or writing a frame
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Socks5Error {
    /// Whether the peer sent a malformed frame
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Socks5Error::UnsupportedVersion(_)
                | Socks5Error::Truncated(_)
                | Socks5Error::InvalidDomain(_)
        )
    }

    /// Reply code to send back to the client, if the error maps onto one
    pub fn reply_code(&self) -> Option<Socks5ReplyCode> {
        match self {
            Socks5Error::CommandNotSupported(_) => Some(Socks5ReplyCode::CommandNotSupported),
            Socks5Error::AddressTypeNotSupported(_) | Socks5Error::InvalidAddressType(_) => {
                Some(Socks5ReplyCode::AddressTypeNotSupported)
            }
            _ => None,
        }
    }
}

/// Reply codes for SOCKS5 protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Socks5ReplyCode {
    /// Command succeeded
    Succeeded = 0x00,
    /// General SOCKS server failure
    GeneralFailure = 0x01,
    /// Connection not allowed by ruleset
    ConnectionNotAllowed = 0x02,
    /// Network unreachable
    NetworkUnreachable = 0x03,
    /// Host unreachable
    HostUnreachable = 0x04,
    /// Connection refused
    ConnectionRefused = 0x05,
    /// TTL expired
    TtlExpired = 0x06,
    /// Command not supported
    CommandNotSupported = 0x07,
    /// Address type not supported
    AddressTypeNotSupported = 0x08,
}

impl From<Socks5ReplyCode> for u8 {
    fn from(code: Socks5ReplyCode) -> Self {
        code as u8
    }
}

impl From<&io::Error> for Socks5ReplyCode {
    fn from(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Socks5ReplyCode::ConnectionRefused,
            io::ErrorKind::TimedOut => Socks5ReplyCode::HostUnreachable,
            io::ErrorKind::AddrNotAvailable => Socks5ReplyCode::HostUnreachable,
            io::ErrorKind::PermissionDenied => Socks5ReplyCode::ConnectionNotAllowed,
            _ => Socks5ReplyCode::GeneralFailure,
        }
    }
}
