//! # Error Types
//!
//! Error handling for the Query protocol client.
//!
//! This module defines all error variants that can occur while framing,
//! classifying, and decoding Query datagrams, plus the driver-level failures.
//!
//! ## Error Categories
//! - **Datagram errors**: invalid magic, type byte, or payload length — these
//!   are scoped to a single inbound datagram. The reader is long-lived and must
//!   survive malformed or forged datagrams indefinitely, so these never
//!   escalate past the classification boundary; the datagram is dropped with a
//!   warning.
//! - **Codec errors**: buffer underrun and malformed fields — raised to the
//!   immediate caller of the decode operation.
//! - **Driver errors**: missing handshake, closed connection.
//! - **I/O errors**: socket failures from the transport.
//!
//! All errors implement `std::error::Error` for interoperability.

use crate::core::packet::PacketKind;
use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
/// Static strings are borrowed, avoiding heap allocations for common cases.
pub mod constants {
    /// Driver sequencing errors
    pub const ERR_HANDSHAKE_REQUIRED: &str =
        "No challenge token available; handshake before requesting stats";
    pub const ERR_RESPONSE_ABANDONED: &str = "Response waiter was dropped before resolution";

    /// Transport errors
    pub const ERR_NOT_CONNECTED: &str = "Transport is not connected";
    pub const ERR_CONNECTION_CLOSED: &str = "Connection closed";

    /// Codec errors
    pub const ERR_EMPTY_DATAGRAM: &str = "Datagram too short for the packet header";
}

/// Primary error type for all Query protocol operations.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Client-to-server datagram did not start with the `0xFE 0xFD` magic.
    #[error("invalid magic: expected fe fd, found {found:02x?}")]
    InvalidMagic { found: [u8; 2] },

    /// Type byte was neither STAT (0) nor HANDSHAKE (9).
    #[error("invalid packet type byte: {0} (expected 0 or 9)")]
    InvalidType(u8),

    /// Server-side STAT payload was neither 4 (basic) nor 8 (full) bytes.
    #[error("invalid STAT payload length: {0} (expected 4 or 8)")]
    InvalidPayloadLength(usize),

    /// A codec read ran past the end of the buffer.
    #[error("buffer underrun: needed {needed} bytes, {remaining} remaining")]
    Underrun { needed: usize, remaining: usize },

    /// A typed field failed to parse from its wire representation.
    #[error("malformed field: {0}")]
    MalformedField(String),

    /// Asked to encode a packet kind with no wire encoding.
    ///
    /// Full-stat responses are decode-only: this client never observes a
    /// canonical server-side serialization and does not guess a layout.
    #[error("packet kind {0:?} cannot be encoded")]
    EncodeUnsupported(PacketKind),

    /// A stat request was issued before a handshake stored a challenge token.
    #[error("{}", constants::ERR_HANDSHAKE_REQUIRED)]
    HandshakeRequired,

    #[error("{}", constants::ERR_CONNECTION_CLOSED)]
    ConnectionClosed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Custom error: {0}")]
    Custom(String),
}

impl QueryError {
    /// Whether this error is scoped to a single inbound datagram.
    ///
    /// Datagram-scoped errors are surfaced as warnings and the datagram is
    /// dropped; the reader keeps listening.
    pub fn is_datagram_scoped(&self) -> bool {
        matches!(
            self,
            QueryError::InvalidMagic { .. }
                | QueryError::InvalidType(_)
                | QueryError::InvalidPayloadLength(_)
        )
    }
}

/// Type alias for Results using QueryError
pub type Result<T> = std::result::Result<T, QueryError>;
