//! # Protocol Layer
//!
//! Session sequencing on top of the core codecs.
//!
//! The driver owns the handshake-then-stat ordering and the challenge-token
//! state; the heavy lifting (framing, classification, field codecs) lives in
//! [`crate::core`].

pub mod driver;

pub use driver::{QueryDriver, SessionState};
