//! Integration tests for the per-kind packet codecs.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use query_protocol::config::{FULL_STAT_PADDING, FULL_STAT_SEPARATOR_LEN};
use query_protocol::core::codec::{decode, encode};
use query_protocol::{
    classify, BasicStat, Packet, PacketKind, PluginInfo, SessionId, Side, StatValue,
};

/// Build a full-stat response payload from key/value pairs and players.
fn full_stat_payload(pairs: &[(&str, &str)], players: &[&str]) -> Vec<u8> {
    let mut payload = FULL_STAT_PADDING.to_vec();
    for (key, value) in pairs {
        payload.extend_from_slice(key.as_bytes());
        payload.push(0);
        payload.extend_from_slice(value.as_bytes());
        payload.push(0);
    }
    payload.push(0); // empty key terminates the section
    payload.extend_from_slice(&[0xAB; FULL_STAT_SEPARATOR_LEN]); // content skipped verbatim
    for player in players {
        payload.extend_from_slice(player.as_bytes());
        payload.push(0);
    }
    payload.push(0); // empty name terminates the list
    payload
}

#[test]
fn basic_stat_response_roundtrip_preserves_string_counts() {
    let stat = BasicStat {
        motd: "A Minecraft Server".to_string(),
        gametype: "SMP".to_string(),
        map: "world".to_string(),
        // Numeric-looking strings must stay strings.
        num_players: "3".to_string(),
        max_players: "20".to_string(),
        host_port: 25565,
        host_address: "127.0.0.1".to_string(),
    };

    let packet = Packet::BasicStatResponse(stat.clone());
    let bytes = encode(&packet, SessionId::new(1), Side::Server).unwrap();

    let classified = classify(&bytes, Side::Client).unwrap();
    assert_eq!(classified.kind, PacketKind::BasicStatResponse);

    let decoded = decode(classified.kind, classified.payload).unwrap();
    assert_eq!(decoded, packet);

    match decoded {
        Packet::BasicStatResponse(decoded_stat) => {
            assert_eq!(decoded_stat.num_players, "3");
            assert_eq!(decoded_stat.max_players, "20");
        }
        other => panic!("expected BasicStatResponse, got {other:?}"),
    }
}

#[test]
fn basic_stat_field_order_is_the_wire_contract() {
    let stat = BasicStat {
        motd: "m".to_string(),
        gametype: "g".to_string(),
        map: "w".to_string(),
        num_players: "1".to_string(),
        max_players: "2".to_string(),
        host_port: 0x0102,
        host_address: "h".to_string(),
    };
    let bytes = encode(
        &Packet::BasicStatResponse(stat),
        SessionId::new(0),
        Side::Server,
    )
    .unwrap();

    // header(5) then cstrings in order, u16le port, trailing cstring
    assert_eq!(&bytes[5..], b"m\0g\0w\01\02\0\x02\x01h\0");
}

#[test]
fn full_stat_decode_applies_per_key_typing() {
    let payload = full_stat_payload(
        &[
            ("hostname", "MyServer"),
            ("numplayers", "3"),
            ("plugins", "CraftBukkit:Plugin1;Plugin2"),
        ],
        &["Alice", "Bob"],
    );

    let decoded = decode(PacketKind::FullStatResponse, &payload).unwrap();
    let stat = match decoded {
        Packet::FullStatResponse(stat) => stat,
        other => panic!("expected FullStatResponse, got {other:?}"),
    };

    assert_eq!(
        stat.get("hostname"),
        Some(&StatValue::Text("MyServer".to_string()))
    );
    assert_eq!(stat.get_int("numplayers"), Some(3));
    assert_eq!(
        stat.get("plugins"),
        Some(&StatValue::Plugins(PluginInfo {
            server_mod: "CraftBukkit".to_string(),
            plugins: vec!["Plugin1".to_string(), "Plugin2".to_string()],
        }))
    );
    assert_eq!(stat.players, vec!["Alice", "Bob"]);
}

#[test]
fn full_stat_decode_is_idempotent_and_keeps_wire_order() {
    let payload = full_stat_payload(
        &[("b", "2"), ("a", "1"), ("c", "3")],
        &["Zed", "Alice", "Zed"],
    );

    let first = decode(PacketKind::FullStatResponse, &payload).unwrap();
    let second = decode(PacketKind::FullStatResponse, &payload).unwrap();
    assert_eq!(first, second);

    let stat = match first {
        Packet::FullStatResponse(stat) => stat,
        other => panic!("expected FullStatResponse, got {other:?}"),
    };
    let keys: Vec<&str> = stat.key_pair.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["b", "a", "c"]);
    // Wire order, duplicates permitted.
    assert_eq!(stat.players, vec!["Zed", "Alice", "Zed"]);
}

#[test]
fn empty_plugins_value_still_yields_an_entry() {
    let payload = full_stat_payload(&[("plugins", "")], &[]);
    let decoded = decode(PacketKind::FullStatResponse, &payload).unwrap();
    let stat = match decoded {
        Packet::FullStatResponse(stat) => stat,
        other => panic!("expected FullStatResponse, got {other:?}"),
    };
    assert_eq!(
        stat.get("plugins"),
        Some(&StatValue::Plugins(PluginInfo::default()))
    );
}

#[test]
fn hostile_numeric_values_do_not_abort_the_loop() {
    let payload = full_stat_payload(
        &[
            ("numplayers", "not a number"),
            ("maxplayers", "20ish"),
            ("hostport", "25565"),
        ],
        &[],
    );

    let decoded = decode(PacketKind::FullStatResponse, &payload).unwrap();
    let stat = match decoded {
        Packet::FullStatResponse(stat) => stat,
        other => panic!("expected FullStatResponse, got {other:?}"),
    };

    // Unparseable value is recorded as text, best-effort prefix parse wins
    // otherwise; decoding reached every entry.
    assert_eq!(
        stat.get("numplayers"),
        Some(&StatValue::Text("not a number".to_string()))
    );
    assert_eq!(stat.get_int("maxplayers"), Some(20));
    assert_eq!(stat.get_int("hostport"), Some(25565));
}

#[test]
fn truncated_full_stat_is_an_underrun() {
    let payload = full_stat_payload(&[("hostname", "x")], &["Alice"]);

    // Chop the terminating player-list byte off.
    let truncated = &payload[..payload.len() - 1];
    assert!(decode(PacketKind::FullStatResponse, truncated).is_err());
}

#[test]
fn full_stat_request_wire_shape() {
    let bytes = encode(
        &Packet::FullStatRequest { challenge_token: 7 },
        SessionId::new(0),
        Side::Server,
    )
    .unwrap();
    // header(5) + int32BE(7) + 4 zero bytes
    assert_eq!(bytes.len(), 13);
    assert_eq!(&bytes[5..9], &[0, 0, 0, 7]);
    assert_eq!(&bytes[9..], &[0, 0, 0, 0]);

    // Decode consumes and discards the padding.
    let decoded = decode(PacketKind::FullStatRequest, &bytes[5..]).unwrap();
    assert_eq!(decoded, Packet::FullStatRequest { challenge_token: 7 });
}

#[test]
fn stat_requests_roundtrip_through_server_side_classification() {
    for (packet, expected_kind) in [
        (
            Packet::BasicStatRequest {
                challenge_token: -42,
            },
            PacketKind::BasicStatRequest,
        ),
        (
            Packet::FullStatRequest {
                challenge_token: -42,
            },
            PacketKind::FullStatRequest,
        ),
    ] {
        let bytes = encode(&packet, SessionId::new(7), Side::Client).unwrap();
        let classified = classify(&bytes, Side::Server).unwrap();
        assert_eq!(classified.kind, expected_kind);
        assert_eq!(decode(classified.kind, classified.payload).unwrap(), packet);
    }
}

#[test]
fn negative_challenge_token_survives_handshake_encoding() {
    let packet = Packet::HandshakeResponse {
        challenge_token: -123456,
    };
    let bytes = encode(&packet, SessionId::new(0), Side::Server).unwrap();
    assert_eq!(&bytes[5..], b"-123456\0");
    assert_eq!(decode(PacketKind::HandshakeResponse, &bytes[5..]).unwrap(), packet);
}
