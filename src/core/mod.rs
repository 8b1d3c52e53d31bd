//! # Core Protocol Components
//!
//! Low-level packet handling: binary cursor, packet registry, classification,
//! and per-kind codecs.
//!
//! This module is the heart of the crate. The Query wire format has no
//! explicit response-subtype discriminator, so inbound datagrams are
//! classified purely from their shape: type byte, payload length, and an
//! 11-byte padding marker that only full-stat responses carry.
//!
//! ## Components
//! - **Cursor**: sequential reader/writer over byte buffers
//! - **Packet**: packet-kind registry and typed packet values
//! - **Classify**: shape-based datagram classification
//! - **Codec**: per-kind body encoding and decoding
//!
//! ## Wire Format
//! ```text
//! [Magic(2), client→server only] [Type(1)] [SessionId(4, i32 BE)] [Payload(N)]
//! ```

pub mod classify;
pub mod codec;
pub mod cursor;
pub mod packet;
