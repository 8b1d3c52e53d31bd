//! Shape-based datagram classification.
//!
//! The Query wire format carries no explicit packet-subtype discriminator, so
//! an inbound datagram is classified from three signals:
//!
//! 1. the wire type byte (`0` = STAT, `9` = HANDSHAKE),
//! 2. the direction of travel (a server reads requests, a client reads
//!    responses),
//! 3. for STAT packets, the payload length — and for ambiguous lengths, an
//!    11-byte padding marker that only full-stat responses open with.
//!
//! The length/marker heuristic is load-bearing: without it a client cannot
//! tell a basic-stat response from a full-stat response at all.
//!
//! Classification is a pure function. It never panics, performs no I/O, and
//! reports malformed datagrams as error values the caller can drop.

use crate::config::{
    BASIC_STAT_PAYLOAD_LEN, FULL_STAT_PADDING, FULL_STAT_PAYLOAD_LEN, MAGIC, TYPE_HANDSHAKE,
    TYPE_STAT,
};
use crate::core::cursor::Reader;
use crate::core::packet::{PacketKind, Side};
use crate::error::{QueryError, Result};

/// A classified datagram: header fields plus the unparsed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified<'a> {
    pub kind: PacketKind,
    /// Session id echoed in every packet, both directions.
    pub session_id: i32,
    /// The body bytes following the header, still to be decoded.
    pub payload: &'a [u8],
}

/// Classify a raw datagram received by the given side.
///
/// # Errors
/// - [`QueryError::InvalidMagic`] — server side, datagram lacks the client
///   magic prefix
/// - [`QueryError::InvalidType`] — type byte is neither STAT nor HANDSHAKE
/// - [`QueryError::InvalidPayloadLength`] — server side, STAT payload is
///   neither a basic (4) nor full (8) request
/// - [`QueryError::Underrun`] — datagram shorter than the packet header
///
/// All of these are datagram-scoped: the caller should drop the datagram and
/// keep listening.
pub fn classify(raw: &[u8], side: Side) -> Result<Classified<'_>> {
    let mut reader = Reader::new(raw);

    // Only client-to-server datagrams carry the magic prefix.
    if side.is_server() {
        let magic = reader.read_bytes(2)?;
        if magic != MAGIC {
            return Err(QueryError::InvalidMagic {
                found: [magic[0], magic[1]],
            });
        }
    }

    let type_byte = reader.read_u8()?;
    let session_id = reader.read_i32_be()?;
    let payload = reader.rest();

    let kind = match type_byte {
        // Direction alone disambiguates the handshake pair; no length check.
        TYPE_HANDSHAKE => {
            if side.is_server() {
                PacketKind::HandshakeRequest
            } else {
                PacketKind::HandshakeResponse
            }
        }
        TYPE_STAT => classify_stat(payload, side)?,
        other => return Err(QueryError::InvalidType(other)),
    };

    Ok(Classified {
        kind,
        session_id,
        payload,
    })
}

/// Resolve the STAT family from payload shape.
fn classify_stat(payload: &[u8], side: Side) -> Result<PacketKind> {
    match payload.len() {
        BASIC_STAT_PAYLOAD_LEN => Ok(PacketKind::BasicStatRequest),
        FULL_STAT_PAYLOAD_LEN => Ok(PacketKind::FullStatRequest),
        len if side.is_server() => Err(QueryError::InvalidPayloadLength(len)),
        _ => {
            // Client side, response-shaped payload: the fixed padding marker
            // is the only signal separating the two response kinds.
            if payload.len() >= FULL_STAT_PADDING.len()
                && payload[..FULL_STAT_PADDING.len()] == FULL_STAT_PADDING
            {
                Ok(PacketKind::FullStatResponse)
            } else {
                Ok(PacketKind::BasicStatResponse)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn frame(magic: bool, type_byte: u8, session_id: i32, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        if magic {
            out.extend_from_slice(&MAGIC);
        }
        out.push(type_byte);
        out.extend_from_slice(&session_id.to_be_bytes());
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn handshake_disambiguates_by_direction() {
        let request = frame(true, TYPE_HANDSHAKE, 42, &[]);
        let classified = classify(&request, Side::Server).unwrap();
        assert_eq!(classified.kind, PacketKind::HandshakeRequest);
        assert_eq!(classified.session_id, 42);

        let response = frame(false, TYPE_HANDSHAKE, 42, b"9513307\0");
        let classified = classify(&response, Side::Client).unwrap();
        assert_eq!(classified.kind, PacketKind::HandshakeResponse);
    }

    #[test]
    fn stat_requests_dispatch_on_length() {
        let basic = frame(true, TYPE_STAT, 1, &7i32.to_be_bytes());
        assert_eq!(
            classify(&basic, Side::Server).unwrap().kind,
            PacketKind::BasicStatRequest
        );

        let mut full_payload = 7i32.to_be_bytes().to_vec();
        full_payload.extend_from_slice(&[0; 4]);
        let full = frame(true, TYPE_STAT, 1, &full_payload);
        assert_eq!(
            classify(&full, Side::Server).unwrap().kind,
            PacketKind::FullStatRequest
        );
    }

    #[test]
    fn responses_split_on_padding_marker() {
        let mut full_payload = FULL_STAT_PADDING.to_vec();
        full_payload.extend_from_slice(b"hostname\0A\0\0");
        let full = frame(false, TYPE_STAT, 1, &full_payload);
        assert_eq!(
            classify(&full, Side::Client).unwrap().kind,
            PacketKind::FullStatResponse
        );

        let basic = frame(false, TYPE_STAT, 1, b"MOTD\0SMP\0world\02\020\0");
        assert_eq!(
            classify(&basic, Side::Client).unwrap().kind,
            PacketKind::BasicStatResponse
        );
    }

    #[test]
    fn bad_magic_is_an_error_value() {
        let mut datagram = frame(true, TYPE_HANDSHAKE, 0, &[]);
        datagram[0] = 0x00;
        match classify(&datagram, Side::Server) {
            Err(QueryError::InvalidMagic { found }) => assert_eq!(found, [0x00, 0xFD]),
            other => panic!("expected InvalidMagic, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_byte_rejected() {
        let datagram = frame(false, 3, 0, &[]);
        assert!(matches!(
            classify(&datagram, Side::Client),
            Err(QueryError::InvalidType(3))
        ));
    }

    #[test]
    fn server_side_odd_stat_length_rejected() {
        let datagram = frame(true, TYPE_STAT, 0, &[1, 2, 3]);
        assert!(matches!(
            classify(&datagram, Side::Server),
            Err(QueryError::InvalidPayloadLength(3))
        ));
    }

    #[test]
    fn truncated_header_is_underrun() {
        assert!(matches!(
            classify(&[0x09, 0x00], Side::Client),
            Err(QueryError::Underrun { .. })
        ));
    }
}
