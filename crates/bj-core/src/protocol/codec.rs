//! Binary codec for the four fixed-width LAN blackjack frames.
//!
//! Wire format (all multi-byte integers big-endian):
//! ```text
//! OFFER    [cookie:4][kind:1][tcp_port:2][server_name:32]       39 bytes
//! REQUEST  [cookie:4][kind:1][rounds:1][client_name:32]         38 bytes
//! DECISION [cookie:4][kind:1][action:5]                         10 bytes
//! PAYLOAD  [cookie:4][kind:1][result:1][rank:2][suit:1]          9 bytes
//! ```
//!
//! Encoding never fails.  Decoding checks, in order, the frame length, the
//! cookie, and the kind byte before any field is interpreted.

use thiserror::Error;

use crate::protocol::messages::{
    Decision, DecisionMessage, MessageKind, OfferMessage, PayloadMessage, RequestMessage,
    ResultCode, DECISION_LEN, DECISION_TOKEN_LEN, MAGIC_COOKIE, NAME_LEN, OFFER_LEN, PAYLOAD_LEN,
    REQUEST_LEN,
};

/// Errors that can occur while decoding a frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The buffer is not exactly the size of the expected frame.
    #[error("invalid frame length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// The first four bytes are not [`MAGIC_COOKIE`].
    #[error("bad magic cookie: 0x{0:08X}")]
    BadCookie(u32),

    /// The kind byte does not match the frame being decoded.
    #[error("unexpected message kind: expected 0x{expected:02X}, got 0x{actual:02X}")]
    UnexpectedKind { expected: u8, actual: u8 },

    /// The PAYLOAD result byte is not a known result code.
    #[error("unknown result code: {0}")]
    UnknownResultCode(u8),

    /// The DECISION token is neither `Hittt` nor `Stand`.
    #[error("unknown decision token: {0:?}")]
    UnknownDecision([u8; DECISION_TOKEN_LEN]),

    /// A name field is not valid UTF-8 after stripping its zero padding.
    #[error("malformed name field: {0}")]
    MalformedName(String),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes an OFFER frame.
///
/// # Examples
///
/// ```rust
/// use bj_core::protocol::{decode_offer, encode_offer, OfferMessage};
///
/// let offer = OfferMessage { tcp_port: 40123, server_name: "Team 1".to_string() };
/// let bytes = encode_offer(&offer);
/// assert_eq!(bytes.len(), 39);
/// assert_eq!(decode_offer(&bytes).unwrap(), offer);
/// ```
pub fn encode_offer(msg: &OfferMessage) -> [u8; OFFER_LEN] {
    let mut buf = [0u8; OFFER_LEN];
    write_header(&mut buf, MessageKind::Offer);
    buf[5..7].copy_from_slice(&msg.tcp_port.to_be_bytes());
    write_name(&mut buf[7..], &msg.server_name);
    buf
}

/// Decodes an OFFER frame.
///
/// # Errors
///
/// Returns [`ProtocolError`] on a wrong length, cookie, kind, or a name that
/// is not UTF-8.
pub fn decode_offer(bytes: &[u8]) -> Result<OfferMessage, ProtocolError> {
    check_frame(bytes, OFFER_LEN, MessageKind::Offer)?;
    Ok(OfferMessage {
        tcp_port: u16::from_be_bytes([bytes[5], bytes[6]]),
        server_name: read_name(&bytes[7..])?,
    })
}

/// Encodes a REQUEST frame.
pub fn encode_request(msg: &RequestMessage) -> [u8; REQUEST_LEN] {
    let mut buf = [0u8; REQUEST_LEN];
    write_header(&mut buf, MessageKind::Request);
    buf[5] = msg.rounds;
    write_name(&mut buf[6..], &msg.client_name);
    buf
}

/// Decodes a REQUEST frame.
///
/// # Errors
///
/// Returns [`ProtocolError`] on a wrong length, cookie, kind, or a name that
/// is not UTF-8.
pub fn decode_request(bytes: &[u8]) -> Result<RequestMessage, ProtocolError> {
    check_frame(bytes, REQUEST_LEN, MessageKind::Request)?;
    Ok(RequestMessage {
        rounds: bytes[5],
        client_name: read_name(&bytes[6..])?,
    })
}

/// Encodes a DECISION frame.
pub fn encode_decision(msg: &DecisionMessage) -> [u8; DECISION_LEN] {
    let mut buf = [0u8; DECISION_LEN];
    write_header(&mut buf, MessageKind::DECISION);
    buf[5..].copy_from_slice(msg.decision.token());
    buf
}

/// Decodes a DECISION frame.
///
/// # Errors
///
/// Returns [`ProtocolError::UnknownDecision`] for any token other than the
/// exact `Hittt` / `Stand`, in addition to the usual framing errors.
pub fn decode_decision(bytes: &[u8]) -> Result<DecisionMessage, ProtocolError> {
    check_frame(bytes, DECISION_LEN, MessageKind::DECISION)?;
    let mut token = [0u8; DECISION_TOKEN_LEN];
    token.copy_from_slice(&bytes[5..DECISION_LEN]);
    let decision = Decision::from_token(&token).ok_or(ProtocolError::UnknownDecision(token))?;
    Ok(DecisionMessage { decision })
}

/// Encodes a PAYLOAD frame.
pub fn encode_payload(msg: &PayloadMessage) -> [u8; PAYLOAD_LEN] {
    let mut buf = [0u8; PAYLOAD_LEN];
    write_header(&mut buf, MessageKind::Payload);
    buf[5] = msg.result as u8;
    buf[6..8].copy_from_slice(&msg.rank.to_be_bytes());
    buf[8] = msg.suit;
    buf
}

/// Decodes a PAYLOAD frame.
///
/// # Errors
///
/// Returns [`ProtocolError::UnknownResultCode`] for a result byte above 3, in
/// addition to the usual framing errors.
pub fn decode_payload(bytes: &[u8]) -> Result<PayloadMessage, ProtocolError> {
    check_frame(bytes, PAYLOAD_LEN, MessageKind::Payload)?;
    let result =
        ResultCode::try_from(bytes[5]).map_err(|_| ProtocolError::UnknownResultCode(bytes[5]))?;
    Ok(PayloadMessage {
        result,
        rank: u16::from_be_bytes([bytes[6], bytes[7]]),
        suit: bytes[8],
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn write_header(buf: &mut [u8], kind: MessageKind) {
    buf[0..4].copy_from_slice(&MAGIC_COOKIE.to_be_bytes());
    buf[4] = kind as u8;
}

/// Length first, then cookie, then kind.
fn check_frame(bytes: &[u8], expected_len: usize, kind: MessageKind) -> Result<(), ProtocolError> {
    if bytes.len() != expected_len {
        return Err(ProtocolError::InvalidLength {
            expected: expected_len,
            actual: bytes.len(),
        });
    }
    let cookie = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if cookie != MAGIC_COOKIE {
        return Err(ProtocolError::BadCookie(cookie));
    }
    if bytes[4] != kind as u8 {
        return Err(ProtocolError::UnexpectedKind {
            expected: kind as u8,
            actual: bytes[4],
        });
    }
    Ok(())
}

/// Writes `name` into a zeroed [`NAME_LEN`] field, truncating on a character
/// boundary so the field always holds valid UTF-8.
fn write_name(field: &mut [u8], name: &str) {
    let mut end = name.len().min(NAME_LEN);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    field[..end].copy_from_slice(&name.as_bytes()[..end]);
}

fn read_name(field: &[u8]) -> Result<String, ProtocolError> {
    let end = field.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    String::from_utf8(field[..end].to_vec())
        .map_err(|e| ProtocolError::MalformedName(e.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
