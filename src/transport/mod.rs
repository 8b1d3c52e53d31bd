//! # Transport Layer
//!
//! Datagram transport the protocol core runs over.
//!
//! The core only needs five operations from a transport: connect, disconnect,
//! send, receive, and lifecycle notification. [`udp::UdpTransport`] provides
//! them over a tokio UDP socket.

pub mod udp;

pub use udp::UdpTransport;
