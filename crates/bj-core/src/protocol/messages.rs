//! All LAN blackjack protocol message types.
//!
//! Every message is a fixed-width frame beginning with the 4-byte
//! [`MAGIC_COOKIE`] followed by a 1-byte kind.  All multi-byte integers are
//! big-endian.  Text fields (display names, decision tokens) are fixed-width
//! and right-padded with zero bytes.

use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Suit};
pub use crate::domain::round::Decision;
use crate::domain::round::{Outcome, RoundEvent};

// ── Protocol constants ────────────────────────────────────────────────────────

/// First four bytes of every frame on the wire.
pub const MAGIC_COOKIE: u32 = 0xABCD_DCBA;

/// Well-known UDP port offers are broadcast to.
pub const DISCOVERY_PORT: u16 = 13122;

/// Width of a display name field in bytes.
pub const NAME_LEN: usize = 32;

/// Width of the decision token field in bytes.
pub const DECISION_TOKEN_LEN: usize = 5;

/// Total size of an OFFER frame.
pub const OFFER_LEN: usize = 4 + 1 + 2 + NAME_LEN;

/// Total size of a REQUEST frame.
pub const REQUEST_LEN: usize = 4 + 1 + 1 + NAME_LEN;

/// Total size of a DECISION frame.
pub const DECISION_LEN: usize = 4 + 1 + DECISION_TOKEN_LEN;

/// Total size of a PAYLOAD frame.
pub const PAYLOAD_LEN: usize = 4 + 1 + 1 + 2 + 1;

// ── Message kinds ─────────────────────────────────────────────────────────────

/// Kind byte following the cookie.
///
/// DECISION frames reuse the PAYLOAD kind on the wire; the two are told apart
/// by direction (client to server vs. server to client) and frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageKind {
    Offer = 0x02,
    Request = 0x03,
    Payload = 0x04,
}

impl MessageKind {
    /// Kind byte carried by DECISION frames.
    pub const DECISION: MessageKind = MessageKind::Payload;
}

// ── Result codes ──────────────────────────────────────────────────────────────

/// Result byte of a PAYLOAD frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ResultCode {
    /// A card was dealt and the round goes on.
    Continue = 0x0,
    Tie = 0x1,
    Loss = 0x2,
    Win = 0x3,
}

impl ResultCode {
    /// Returns the round outcome this code announces, or `None` for
    /// [`ResultCode::Continue`].
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            ResultCode::Continue => None,
            ResultCode::Tie => Some(Outcome::Tie),
            ResultCode::Loss => Some(Outcome::Loss),
            ResultCode::Win => Some(Outcome::Win),
        }
    }
}

impl From<Outcome> for ResultCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Tie => ResultCode::Tie,
            Outcome::Loss => ResultCode::Loss,
            Outcome::Win => ResultCode::Win,
        }
    }
}

impl TryFrom<u8> for ResultCode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x0 => Ok(ResultCode::Continue),
            0x1 => Ok(ResultCode::Tie),
            0x2 => Ok(ResultCode::Loss),
            0x3 => Ok(ResultCode::Win),
            _ => Err(()),
        }
    }
}

// ── Decisions ─────────────────────────────────────────────────────────────────

impl Decision {
    /// The exact 5-byte token sent on the wire.
    pub fn token(self) -> &'static [u8; DECISION_TOKEN_LEN] {
        match self {
            Decision::Hit => b"Hittt",
            Decision::Stand => b"Stand",
        }
    }

    /// Parses a wire token.  Only the two exact tokens are accepted.
    pub fn from_token(token: &[u8; DECISION_TOKEN_LEN]) -> Option<Self> {
        match token {
            b"Hittt" => Some(Decision::Hit),
            b"Stand" => Some(Decision::Stand),
            _ => None,
        }
    }
}

// ── Per-message structs ───────────────────────────────────────────────────────

/// OFFER (UDP): a server advertising its game port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferMessage {
    /// TCP port the server accepts game sessions on.
    pub tcp_port: u16,
    /// Server display name; at most [`NAME_LEN`] bytes survive encoding.
    pub server_name: String,
}

/// REQUEST (TCP, client to server): opens a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMessage {
    /// Number of rounds the client wants to play.
    pub rounds: u8,
    /// Client display name; at most [`NAME_LEN`] bytes survive encoding.
    pub client_name: String,
}

/// DECISION (TCP, client to server): hit or stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionMessage {
    pub decision: Decision,
}

/// PAYLOAD (TCP, server to client): a dealt card or a round outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadMessage {
    pub result: ResultCode,
    /// Card rank 1..=13, or 0 on the outcome sentinel.
    pub rank: u16,
    /// Card suit 0..=3, or 0 on the outcome sentinel.
    pub suit: u8,
}

impl PayloadMessage {
    /// A card event tagged with `result`.
    pub fn card(result: ResultCode, card: Card) -> Self {
        Self {
            result,
            rank: u16::from(card.rank()),
            suit: card.suit() as u8,
        }
    }

    /// The final outcome event of a round (sentinel card 0/0).
    pub fn outcome(outcome: Outcome) -> Self {
        Self {
            result: outcome.into(),
            rank: 0,
            suit: 0,
        }
    }

    /// Returns the carried card, or `None` for the sentinel or an out-of-range
    /// rank/suit.
    pub fn dealt_card(&self) -> Option<Card> {
        let rank = u8::try_from(self.rank).ok()?;
        let suit = Suit::try_from(self.suit).ok()?;
        Card::new(rank, suit)
    }

    /// Returns `true` when this event ends the round.
    pub fn is_final(&self) -> bool {
        self.result != ResultCode::Continue
    }
}

impl From<&RoundEvent> for PayloadMessage {
    fn from(event: &RoundEvent) -> Self {
        match *event {
            RoundEvent::PlayerCard(card) | RoundEvent::DealerCard(card) => {
                PayloadMessage::card(ResultCode::Continue, card)
            }
            RoundEvent::PlayerBust(card) => PayloadMessage::card(ResultCode::Loss, card),
            RoundEvent::Resolved(outcome) => PayloadMessage::outcome(outcome),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_sizes_match_wire_layout() {
        assert_eq!(OFFER_LEN, 39);
        assert_eq!(REQUEST_LEN, 38);
        assert_eq!(DECISION_LEN, 10);
        assert_eq!(PAYLOAD_LEN, 9);
    }

    #[test]
    fn test_message_kind_wire_bytes() {
        assert_eq!(MessageKind::Offer as u8, 0x02);
        assert_eq!(MessageKind::Request as u8, 0x03);
        assert_eq!(MessageKind::Payload as u8, 0x04);
    }

    #[test]
    fn test_decision_kind_shares_payload_byte() {
        assert_eq!(MessageKind::DECISION as u8, 0x04);
    }

    #[test]
    fn test_decision_tokens_are_exact() {
        assert_eq!(Decision::from_token(b"Hittt"), Some(Decision::Hit));
        assert_eq!(Decision::from_token(b"Stand"), Some(Decision::Stand));
        assert_eq!(Decision::from_token(b"Hit\0\0"), None);
        assert_eq!(Decision::from_token(b"stand"), None);
    }

    #[test]
    fn test_result_code_outcome_mapping() {
        assert_eq!(ResultCode::Continue.outcome(), None);
        assert_eq!(ResultCode::Tie.outcome(), Some(Outcome::Tie));
        assert_eq!(ResultCode::Loss.outcome(), Some(Outcome::Loss));
        assert_eq!(ResultCode::Win.outcome(), Some(Outcome::Win));
        assert!(ResultCode::try_from(4).is_err());
    }

    #[test]
    fn test_payload_outcome_uses_sentinel_card() {
        // Arrange / Act
        let p = PayloadMessage::outcome(Outcome::Win);

        // Assert
        assert_eq!(p.result, ResultCode::Win);
        assert_eq!((p.rank, p.suit), (0, 0));
        assert_eq!(p.dealt_card(), None);
        assert!(p.is_final());
    }

    #[test]
    fn test_payload_from_bust_event_is_loss_tagged_card() {
        // Arrange
        let card = Card::new(5, Suit::Clubs).unwrap();

        // Act
        let p = PayloadMessage::from(&RoundEvent::PlayerBust(card));

        // Assert
        assert_eq!(p.result, ResultCode::Loss);
        assert_eq!(p.dealt_card(), Some(card));
    }

    #[test]
    fn test_payload_from_dealer_card_continues() {
        let card = Card::new(13, Suit::Spades).unwrap();
        let p = PayloadMessage::from(&RoundEvent::DealerCard(card));
        assert_eq!(p.result, ResultCode::Continue);
        assert_eq!(p.rank, 13);
        assert_eq!(p.suit, 3);
        assert!(!p.is_final());
    }
}
