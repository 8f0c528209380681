//! # bj-core
//!
//! Shared library for LAN blackjack containing the wire protocol codec and
//! the game engine.
//!
//! This crate is used by both the server (dealer) and client (player)
//! applications.  It has no dependencies on sockets or console I/O.
//!
//! - **`protocol`** – The four fixed-width frames (Offer, Request, Decision,
//!   Payload), their constants, and the encode/decode functions.
//!
//! - **`domain`** – Cards, hands, and the [`Round`] state machine that deals,
//!   applies hit/stand decisions, plays the dealer, and decides the outcome.
//!   Cards come from an injected [`CardSampler`].

pub mod domain;
pub mod protocol;

pub use domain::{Card, CardSampler, Decision, Hand, Outcome, Round, RoundEvent, Suit};
pub use protocol::codec::ProtocolError;
pub use protocol::messages::{
    DecisionMessage, OfferMessage, PayloadMessage, RequestMessage, ResultCode, DISCOVERY_PORT,
    MAGIC_COOKIE,
};
