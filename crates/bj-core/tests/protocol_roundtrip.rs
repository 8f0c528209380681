//! Integration tests for the bj-core protocol codec.
//!
//! These tests verify encode/decode round trips for every frame through the
//! public API, and that every decoder rejects a frame whose cookie is wrong
//! before looking at any other field.

use bj_core::protocol::{
    decode_decision, decode_offer, decode_payload, decode_request, encode_decision, encode_offer,
    encode_payload, encode_request, Decision, DecisionMessage, OfferMessage, PayloadMessage,
    ProtocolError, RequestMessage, ResultCode, DECISION_LEN, OFFER_LEN, PAYLOAD_LEN, REQUEST_LEN,
};

#[test]
fn test_roundtrip_offer_across_port_range() {
    for tcp_port in [0u16, 1, 13122, 40_000, u16::MAX] {
        let original = OfferMessage {
            tcp_port,
            server_name: "Team 1".to_string(),
        };

        let decoded = decode_offer(&encode_offer(&original)).expect("decode must succeed");

        assert_eq!(original, decoded);
    }
}

#[test]
fn test_roundtrip_offer_with_full_width_name() {
    let original = OfferMessage {
        tcp_port: 5555,
        server_name: "N".repeat(32),
    };

    assert_eq!(original, decode_offer(&encode_offer(&original)).unwrap());
}

#[test]
fn test_roundtrip_request_across_round_counts() {
    for rounds in [0u8, 1, 5, 255] {
        let original = RequestMessage {
            rounds,
            client_name: "Team 2".to_string(),
        };

        assert_eq!(original, decode_request(&encode_request(&original)).unwrap());
    }
}

#[test]
fn test_roundtrip_request_with_empty_name() {
    let original = RequestMessage {
        rounds: 2,
        client_name: String::new(),
    };

    assert_eq!(original, decode_request(&encode_request(&original)).unwrap());
}

#[test]
fn test_roundtrip_both_decisions() {
    for decision in [Decision::Hit, Decision::Stand] {
        let original = DecisionMessage { decision };

        assert_eq!(original, decode_decision(&encode_decision(&original)).unwrap());
    }
}

#[test]
fn test_roundtrip_payload_results_and_cards() {
    let results = [
        ResultCode::Continue,
        ResultCode::Tie,
        ResultCode::Loss,
        ResultCode::Win,
    ];
    for result in results {
        for (rank, suit) in [(0u16, 0u8), (1, 0), (13, 3), (u16::MAX, u8::MAX)] {
            let original = PayloadMessage { result, rank, suit };

            assert_eq!(original, decode_payload(&encode_payload(&original)).unwrap());
        }
    }
}

#[test]
fn test_every_decoder_rejects_a_bad_cookie() {
    // Arrange: valid frames with the first cookie byte flipped
    let mut offer = encode_offer(&OfferMessage {
        tcp_port: 1,
        server_name: "s".to_string(),
    });
    let mut request = encode_request(&RequestMessage {
        rounds: 1,
        client_name: "c".to_string(),
    });
    let mut decision = encode_decision(&DecisionMessage {
        decision: Decision::Hit,
    });
    let mut payload = encode_payload(&PayloadMessage {
        result: ResultCode::Continue,
        rank: 1,
        suit: 1,
    });
    offer[0] ^= 0xFF;
    request[0] ^= 0xFF;
    decision[0] ^= 0xFF;
    payload[0] ^= 0xFF;

    // Act / Assert
    assert!(matches!(decode_offer(&offer), Err(ProtocolError::BadCookie(_))));
    assert!(matches!(decode_request(&request), Err(ProtocolError::BadCookie(_))));
    assert!(matches!(decode_decision(&decision), Err(ProtocolError::BadCookie(_))));
    assert!(matches!(decode_payload(&payload), Err(ProtocolError::BadCookie(_))));
}

#[test]
fn test_bad_cookie_wins_over_garbage_in_remaining_bytes() {
    // Every byte after the cookie is garbage, including an unknown kind and
    // an unknown result code; the cookie check still fires first.
    let mut payload = [0xFFu8; PAYLOAD_LEN];
    payload[0..4].copy_from_slice(&0xDEAD_BEEFu32.to_be_bytes());
    let mut decision = [0xFFu8; DECISION_LEN];
    decision[0..4].copy_from_slice(&0xDEAD_BEEFu32.to_be_bytes());

    assert_eq!(
        decode_payload(&payload),
        Err(ProtocolError::BadCookie(0xDEAD_BEEF))
    );
    assert_eq!(
        decode_decision(&decision),
        Err(ProtocolError::BadCookie(0xDEAD_BEEF))
    );
}

#[test]
fn test_decoders_reject_frames_of_other_kinds() {
    // An OFFER body resized to REQUEST length still carries the OFFER kind.
    let offer = encode_offer(&OfferMessage {
        tcp_port: 1,
        server_name: "s".to_string(),
    });
    let as_request = &offer[..REQUEST_LEN];

    assert!(matches!(
        decode_request(as_request),
        Err(ProtocolError::UnexpectedKind {
            expected: 0x03,
            actual: 0x02
        })
    ));
}

#[test]
fn test_decoders_reject_wrong_lengths() {
    let request = encode_request(&RequestMessage {
        rounds: 1,
        client_name: "c".to_string(),
    });

    assert!(matches!(
        decode_offer(&request),
        Err(ProtocolError::InvalidLength {
            expected: OFFER_LEN,
            actual: REQUEST_LEN
        })
    ));
    assert!(matches!(
        decode_payload(&[]),
        Err(ProtocolError::InvalidLength { .. })
    ));
}
