//! # Configuration and Wire Constants
//!
//! Centralized configuration for the Query protocol client.
//!
//! The fixed wire-format constants live here alongside the structured client
//! configuration (bind address, default port, session-id override).
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-variable overrides via `from_env()`

use crate::error::{QueryError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Magic bytes prefixing every client-to-server datagram.
pub const MAGIC: [u8; 2] = [0xFE, 0xFD];

/// Wire type code for stat packets (requests and responses).
pub const TYPE_STAT: u8 = 0;

/// Wire type code for handshake packets (requests and responses).
pub const TYPE_HANDSHAKE: u8 = 9;

/// STAT request payload length for a basic stat request (challenge token only).
pub const BASIC_STAT_PAYLOAD_LEN: usize = 4;

/// STAT request payload length for a full stat request (token + 4 pad bytes).
pub const FULL_STAT_PAYLOAD_LEN: usize = 8;

/// Fixed padding opening every full-stat response payload: `"splitnum\0"`
/// followed by two marker bytes. The protocol carries no response-subtype tag,
/// so this sequence is the only way to tell a full-stat response from a basic
/// one.
pub const FULL_STAT_PADDING: [u8; 11] = [
    0x73, 0x70, 0x6C, 0x69, 0x74, 0x6E, 0x75, 0x6D, 0x00, 0x80, 0x00,
];

/// Length of the section separator between a full-stat response's key/value
/// block and its player list. Content is not interpreted, only skipped.
pub const FULL_STAT_SEPARATOR_LEN: usize = 10;

/// Only the low nibble of each session-id byte is guaranteed to survive the
/// protocol; generation masks every byte with `0x0F`.
pub const SESSION_ID_MASK: u32 = 0x0F0F_0F0F;

/// Default Query server port.
pub const DEFAULT_PORT: u16 = 25565;

/// Client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server port to query.
    pub port: u16,

    /// Local address the UDP socket binds to.
    pub bind_address: String,

    /// Fixed session id to use instead of generating a random one.
    /// Raw values are masked to the low nibble of each byte.
    pub session_id: Option<u32>,

    /// Size of the inbound datagram buffer. Full-stat responses from large
    /// servers are the biggest datagrams this client sees.
    pub recv_buffer_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: "0.0.0.0:0".to_string(),
            session_id: None,
            recv_buffer_size: 4096,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| QueryError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| QueryError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| QueryError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Start with defaults
        let mut config = Self::default();

        // Override with environment variables
        if let Ok(port) = std::env::var("QUERY_PROTOCOL_PORT") {
            if let Ok(val) = port.parse::<u16>() {
                config.port = val;
            }
        }

        if let Ok(addr) = std::env::var("QUERY_PROTOCOL_BIND_ADDRESS") {
            config.bind_address = addr;
        }

        if let Ok(session) = std::env::var("QUERY_PROTOCOL_SESSION_ID") {
            if let Ok(val) = session.parse::<u32>() {
                config.session_id = Some(val);
            }
        }

        if let Ok(size) = std::env::var("QUERY_PROTOCOL_RECV_BUFFER_SIZE") {
            if let Ok(val) = size.parse::<usize>() {
                config.recv_buffer_size = val;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means the configuration
    /// is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("port must be non-zero".to_string());
        }

        if self.bind_address.parse::<std::net::SocketAddr>().is_err() {
            errors.push(format!(
                "bind_address '{}' is not a valid socket address",
                self.bind_address
            ));
        }

        // A header is 5 bytes; anything smaller cannot hold a single packet.
        if self.recv_buffer_size < 16 {
            errors.push(format!(
                "recv_buffer_size {} is too small to hold a response datagram",
                self.recv_buffer_size
            ));
        }

        if let Some(session_id) = self.session_id {
            if session_id & !SESSION_ID_MASK != 0 {
                errors.push(format!(
                    "session_id {session_id:#010x} has bits outside the low nibble of each \
                     byte; they will be masked off on the wire"
                ));
            }
        }

        errors
    }
}
