//! Per-kind packet body codecs and header framing.
//!
//! [`encode`] produces a complete wire datagram: the client magic (when the
//! encoding side is the client), the type byte, the session id, and the
//! kind-specific body. [`decode`] turns a classified payload back into a typed
//! [`Packet`]. Both are pure functions; no state is carried between calls.
//!
//! Full-stat responses are decode-only. They are produced exclusively by
//! servers and this crate does not guess at a canonical serialization for
//! them (see [`QueryError::EncodeUnsupported`]).

use crate::config::{FULL_STAT_PADDING, FULL_STAT_SEPARATOR_LEN, MAGIC};
use crate::core::cursor::{Reader, Writer};
use crate::core::packet::{
    BasicStat, FullStat, Packet, PacketKind, PluginInfo, SessionId, Side, StatValue,
};
use crate::error::{QueryError, Result};
use bytes::Bytes;

/// Full-stat keys whose values are decoded as integers.
const INT_KEYS: [&str; 3] = ["numplayers", "maxplayers", "hostport"];

/// Key whose value carries the server mod name and plugin list.
const PLUGINS_KEY: &str = "plugins";

/// Encode a packet into a complete wire datagram.
///
/// The magic prefix is written only when `side` is [`Side::Client`]; servers
/// respond without it.
///
/// # Errors
/// [`QueryError::EncodeUnsupported`] for [`Packet::FullStatResponse`].
pub fn encode(packet: &Packet, session_id: SessionId, side: Side) -> Result<Bytes> {
    let mut writer = Writer::with_capacity(16);

    if side == Side::Client {
        writer.write_bytes(&MAGIC);
    }
    writer.write_u8(packet.kind().type_byte());
    writer.write_i32_be(session_id.value());

    match packet {
        Packet::HandshakeRequest => {}
        Packet::HandshakeResponse { challenge_token } => {
            writer.write_cstring(&challenge_token.to_string());
        }
        Packet::BasicStatRequest { challenge_token } => {
            writer.write_i32_be(*challenge_token);
        }
        Packet::BasicStatResponse(stat) => {
            writer.write_cstring(&stat.motd);
            writer.write_cstring(&stat.gametype);
            writer.write_cstring(&stat.map);
            writer.write_cstring(&stat.num_players);
            writer.write_cstring(&stat.max_players);
            writer.write_u16_le(stat.host_port);
            writer.write_cstring(&stat.host_address);
        }
        Packet::FullStatRequest { challenge_token } => {
            writer.write_i32_be(*challenge_token);
            writer.write_bytes(&[0; 4]);
        }
        Packet::FullStatResponse(_) => {
            return Err(QueryError::EncodeUnsupported(PacketKind::FullStatResponse));
        }
    }

    Ok(writer.finish())
}

/// Decode a classified payload into a typed packet.
///
/// `kind` comes from [`crate::core::classify::classify`]; `payload` is the
/// body after the header.
///
/// # Errors
/// [`QueryError::Underrun`] when the payload is shorter than the kind
/// requires; [`QueryError::MalformedField`] when a challenge token does not
/// parse.
pub fn decode(kind: PacketKind, payload: &[u8]) -> Result<Packet> {
    let mut reader = Reader::new(payload);

    match kind {
        PacketKind::HandshakeRequest => Ok(Packet::HandshakeRequest),
        PacketKind::HandshakeResponse => {
            let raw = reader.read_cstring()?;
            let challenge_token = parse_int_prefix(&raw)
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| {
                    QueryError::MalformedField(format!("challenge token '{raw}' is not an i32"))
                })?;
            Ok(Packet::HandshakeResponse { challenge_token })
        }
        PacketKind::BasicStatRequest => Ok(Packet::BasicStatRequest {
            challenge_token: reader.read_i32_be()?,
        }),
        PacketKind::BasicStatResponse => {
            // Field order is part of the wire contract; not reorderable.
            Ok(Packet::BasicStatResponse(BasicStat {
                motd: reader.read_cstring()?,
                gametype: reader.read_cstring()?,
                map: reader.read_cstring()?,
                num_players: reader.read_cstring()?,
                max_players: reader.read_cstring()?,
                host_port: reader.read_u16_le()?,
                host_address: reader.read_cstring()?,
            }))
        }
        PacketKind::FullStatRequest => {
            let challenge_token = reader.read_i32_be()?;
            // 4 padding bytes follow the token; consumed and discarded.
            reader.read_bytes(4)?;
            Ok(Packet::FullStatRequest { challenge_token })
        }
        PacketKind::FullStatResponse => Ok(Packet::FullStatResponse(decode_full_stat(
            &mut reader,
        )?)),
    }
}

fn decode_full_stat(reader: &mut Reader<'_>) -> Result<FullStat> {
    reader.read_bytes(FULL_STAT_PADDING.len())?;

    let mut key_pair = Vec::new();
    loop {
        let key = reader.read_cstring()?;
        if key.is_empty() {
            break;
        }
        let value = reader.read_cstring()?;
        let typed = type_stat_value(&key, &value);
        key_pair.push((key, typed));
    }

    reader.read_bytes(FULL_STAT_SEPARATOR_LEN)?;

    let mut players = Vec::new();
    loop {
        let player = reader.read_cstring()?;
        if player.is_empty() {
            break;
        }
        players.push(player);
    }

    Ok(FullStat { key_pair, players })
}

/// Apply the per-key typing rules to a full-stat value.
///
/// Numeric keys parse best-effort: a value with no leading digits stays text
/// rather than aborting the key/value loop. Stat payloads are hostile input;
/// callers must not rely on validated numbers from this path.
fn type_stat_value(key: &str, value: &str) -> StatValue {
    if key == PLUGINS_KEY {
        return StatValue::Plugins(parse_plugins(value));
    }

    if INT_KEYS.contains(&key) {
        if let Some(n) = parse_int_prefix(value) {
            return StatValue::Int(n);
        }
        // Best-effort: record what the server sent.
        return StatValue::Text(value.to_string());
    }

    StatValue::Text(value.to_string())
}

/// Parse a `plugins` value of the form `mod_name:plugin1;plugin2;...`.
///
/// An empty value still yields an (empty) entry; a value with no colon
/// carries only the mod name.
fn parse_plugins(value: &str) -> PluginInfo {
    if value.is_empty() {
        return PluginInfo::default();
    }

    let mut parts = value.splitn(2, ':');
    let server_mod = parts.next().unwrap_or_default().to_string();
    let plugins = match parts.next() {
        Some(list) => list.split(';').map(str::to_string).collect(),
        None => Vec::new(),
    };

    PluginInfo {
        server_mod,
        plugins,
    }
}

/// Best-effort decimal parse: optional sign followed by leading ASCII digits;
/// trailing garbage is ignored. Returns `None` when no digits lead the value.
fn parse_int_prefix(value: &str) -> Option<i64> {
    let s = value.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    digits[..end]
        .parse::<i64>()
        .ok()
        .map(|n| if negative { -n } else { n })
}
