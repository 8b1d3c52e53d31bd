//! Packet-kind registry and typed packet values.
//!
//! The Query protocol has exactly six packet kinds sharing two wire type
//! codes: `0` for every STAT variant and `9` for both HANDSHAKE variants. The
//! type code alone never identifies a kind — classification additionally
//! needs the direction of travel and, for STAT, the payload shape (see
//! [`crate::core::classify`]).
//!
//! Packet values are plain data: created fresh per encode/decode call and
//! never mutated after decode.

use crate::config::{SESSION_ID_MASK, TYPE_HANDSHAKE, TYPE_STAT};
use serde::{Deserialize, Serialize};

/// Which end of the exchange this party is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The querying client; prefixes outbound datagrams with the magic.
    Client,
    /// The queried server; expects the magic on inbound datagrams.
    Server,
}

impl Side {
    pub fn is_server(self) -> bool {
        matches!(self, Side::Server)
    }
}

/// Closed enumeration of the protocol's packet kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    HandshakeRequest,
    HandshakeResponse,
    BasicStatRequest,
    BasicStatResponse,
    FullStatRequest,
    FullStatResponse,
}

impl PacketKind {
    /// The wire type code this kind is sent under.
    pub fn type_byte(self) -> u8 {
        match self {
            PacketKind::HandshakeRequest | PacketKind::HandshakeResponse => TYPE_HANDSHAKE,
            PacketKind::BasicStatRequest
            | PacketKind::BasicStatResponse
            | PacketKind::FullStatRequest
            | PacketKind::FullStatResponse => TYPE_STAT,
        }
    }

    /// Whether this kind travels client-to-server.
    pub fn is_request(self) -> bool {
        matches!(
            self,
            PacketKind::HandshakeRequest
                | PacketKind::BasicStatRequest
                | PacketKind::FullStatRequest
        )
    }
}

/// Challenge token issued by the server during handshake.
///
/// Decimal-string encoded in the handshake response, raw int32 in stat
/// requests. Valid until the server rotates it; there is no in-protocol
/// expiry signal.
pub type ChallengeToken = i32;

/// Session identifier echoed in every packet, both directions.
///
/// Only the low nibble of each byte is guaranteed to survive the protocol, so
/// construction masks the value with `0x0F0F0F0F`. Immutable for the lifetime
/// of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionId(i32);

impl SessionId {
    /// Build a session id from a raw value, masking each byte to its low
    /// nibble.
    pub fn new(raw: u32) -> Self {
        Self((raw & SESSION_ID_MASK) as i32)
    }

    /// The on-wire value.
    pub fn value(self) -> i32 {
        self.0
    }
}

impl From<u32> for SessionId {
    fn from(raw: u32) -> Self {
        Self::new(raw)
    }
}

/// Basic stat response fields, in wire order.
///
/// The player counts are transmitted as strings by design and are kept as
/// strings here; coercing them would destroy round-trip fidelity and hide
/// hostile input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicStat {
    pub motd: String,
    pub gametype: String,
    pub map: String,
    pub num_players: String,
    pub max_players: String,
    pub host_port: u16,
    pub host_address: String,
}

/// Server mod name and plugin list, parsed from the full-stat `plugins` value.
///
/// The wire form is `mod_name:plugin1;plugin2;...`; a value with no colon
/// carries only the mod name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    pub server_mod: String,
    pub plugins: Vec<String>,
}

/// A single value in a full-stat key/value section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatValue {
    Text(String),
    Int(i64),
    Plugins(PluginInfo),
}

/// Full stat response: key/value section plus the online player list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullStat {
    /// Key/value entries in the order they arrived on the wire. Stat dumps
    /// are small, so lookups stay linear rather than trading away wire order
    /// for a map.
    pub key_pair: Vec<(String, StatValue)>,
    /// Online player names, wire order, duplicates permitted.
    pub players: Vec<String>,
}

impl FullStat {
    /// First value recorded under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&StatValue> {
        self.key_pair
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Integer value recorded under `key`, if present and numeric.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            Some(StatValue::Int(n)) => Some(*n),
            _ => None,
        }
    }
}

/// A decoded (or to-be-encoded) packet of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// Empty payload; presence alone asks the server for a challenge token.
    HandshakeRequest,
    HandshakeResponse {
        challenge_token: ChallengeToken,
    },
    BasicStatRequest {
        challenge_token: ChallengeToken,
    },
    BasicStatResponse(BasicStat),
    /// Carries 4 zero padding bytes on the wire after the token.
    FullStatRequest {
        challenge_token: ChallengeToken,
    },
    FullStatResponse(FullStat),
}

impl Packet {
    pub fn kind(&self) -> PacketKind {
        match self {
            Packet::HandshakeRequest => PacketKind::HandshakeRequest,
            Packet::HandshakeResponse { .. } => PacketKind::HandshakeResponse,
            Packet::BasicStatRequest { .. } => PacketKind::BasicStatRequest,
            Packet::BasicStatResponse(_) => PacketKind::BasicStatResponse,
            Packet::FullStatRequest { .. } => PacketKind::FullStatRequest,
            Packet::FullStatResponse(_) => PacketKind::FullStatResponse,
        }
    }
}
