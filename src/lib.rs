//! # query-protocol
//!
//! Client implementation of the UDP game-server Query status protocol.
//!
//! A Query server answers unauthenticated UDP requests with either a compact
//! status summary or a full key/value dump plus the online-player list. The
//! exchange is: handshake for a short-lived challenge token, then stat
//! requests carrying that token. Responses carry no explicit subtype tag —
//! inbound datagrams are classified purely from their shape (type byte,
//! payload length, and a fixed 11-byte padding marker).
//!
//! ## Layers
//! - [`core`] — binary cursor, packet registry, shape-based classifier, and
//!   per-kind codecs. This is where the wire format lives.
//! - [`protocol`] — the session driver: handshake-then-stat sequencing,
//!   challenge-token state, kind-keyed response waiters.
//! - [`transport`] — connected UDP datagram transport (tokio).
//! - [`service`] — the high-level async [`QueryClient`].
//!
//! ## Example
//! ```ignore
//! use query_protocol::QueryClient;
//!
//! let mut client = QueryClient::connect("mc.example.org", 25565).await?;
//! client.handshake().await?;
//!
//! let stat = client.full_stat().await?;
//! for player in &stat.players {
//!     println!("online: {player}");
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod service;
pub mod transport;
pub mod utils;

pub use config::ClientConfig;
pub use core::classify::{classify, Classified};
pub use core::packet::{
    BasicStat, ChallengeToken, FullStat, Packet, PacketKind, PluginInfo, SessionId, Side,
    StatValue,
};
pub use error::{QueryError, Result};
pub use protocol::driver::{QueryDriver, SessionState};
pub use service::QueryClient;
