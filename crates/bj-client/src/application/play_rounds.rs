//! PlayRoundsUseCase: plays a whole session against a dealer server.
//!
//! The server never says whose card a PAYLOAD carries; the client infers it
//! from the order of the stream:
//!
//! 1. The first two cards of a round are the player's, the third is the
//!    dealer's up card.  If those two cards already total over 21 the next
//!    PAYLOAD is the final loss and no decision is asked for.
//! 2. After a Hit, exactly one PAYLOAD follows: the player's new card,
//!    tagged Loss if it busted.
//! 3. After a Stand, every Continue card belongs to the dealer until a
//!    PAYLOAD with a non-zero result ends the round.
//!
//! Decisions and notifications go through the [`Player`] trait so the same
//! loop serves the console and the automatic player.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use bj_core::domain::{Card, Decision, Hand, Outcome};
use bj_core::protocol::{
    decode_payload, encode_decision, encode_request, DecisionMessage, PayloadMessage,
    ProtocolError, RequestMessage, PAYLOAD_LEN,
};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time;
use tracing::debug;

/// Errors that end a client session.
#[derive(Debug, Error)]
pub enum PlayError {
    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("connection closed by server")]
    Closed,
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    /// A well-formed frame arrived where the game flow does not allow it.
    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),
    #[error("server timed out after {0:?}")]
    TimedOut(Duration),
}

/// Whose hand a card went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Player,
    Dealer,
}

/// Everything the player can see of the current round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    pub player: Hand,
    /// Only the dealer cards revealed so far.
    pub dealer: Hand,
}

impl TableView {
    fn deal(&mut self, seat: Seat, card: Card) {
        match seat {
            Seat::Player => self.player.push(card),
            Seat::Dealer => self.dealer.push(card),
        };
    }
}

/// Running results of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionTally {
    pub rounds: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl SessionTally {
    pub fn record(&mut self, outcome: Outcome) {
        self.rounds += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Tie => self.ties += 1,
        }
    }

    /// Fraction of rounds won; `0.0` before any round.
    pub fn win_rate(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.rounds)
        }
    }
}

/// Source of decisions and sink for game notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Player: Send {
    /// Chooses hit or stand for the current table.
    async fn decide(&mut self, table: &TableView) -> Decision;

    /// Called for every card revealed, in stream order.
    fn card_dealt(&mut self, seat: Seat, card: Card);

    /// Called once per round with the final table.
    fn round_finished(&mut self, outcome: Outcome, table: &TableView);
}

/// The Play Rounds use case.
pub struct PlayRoundsUseCase {
    io_timeout: Option<Duration>,
}

impl PlayRoundsUseCase {
    /// `io_timeout` bounds each read and write; `None` waits forever.
    pub fn new(io_timeout: Option<Duration>) -> Self {
        Self { io_timeout }
    }

    /// Sends the Request and plays `rounds` rounds over `stream`.
    ///
    /// # Errors
    ///
    /// Returns [`PlayError`] on the first transport or protocol failure.
    pub async fn play<S, P>(
        &self,
        mut stream: S,
        client_name: &str,
        rounds: u8,
        player: &mut P,
    ) -> Result<SessionTally, PlayError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
        P: Player + ?Sized,
    {
        let request = encode_request(&RequestMessage {
            rounds,
            client_name: client_name.to_string(),
        });
        self.with_deadline(stream.write_all(&request)).await?;

        let mut tally = SessionTally::default();
        for round_no in 1..=rounds {
            let (outcome, table) = self.play_round(&mut stream, player).await?;
            debug!(round = round_no, ?outcome, "round finished");
            player.round_finished(outcome, &table);
            tally.record(outcome);
        }
        Ok(tally)
    }

    async fn play_round<S, P>(
        &self,
        stream: &mut S,
        player: &mut P,
    ) -> Result<(Outcome, TableView), PlayError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
        P: Player + ?Sized,
    {
        let mut table = TableView::default();
        for seat in [Seat::Player, Seat::Player, Seat::Dealer] {
            let payload = self.recv(stream).await?;
            if payload.is_final() {
                return Err(PlayError::UnexpectedPayload(format!(
                    "round ended during the deal: {payload:?}"
                )));
            }
            let card = require_card(&payload)?;
            table.deal(seat, card);
            player.card_dealt(seat, card);
        }

        if table.player.is_bust() {
            let payload = self.recv(stream).await?;
            return match payload.result.outcome() {
                Some(outcome) if payload.dealt_card().is_none() => Ok((outcome, table)),
                _ => Err(PlayError::UnexpectedPayload(format!(
                    "expected the outcome of a busted deal, got {payload:?}"
                ))),
            };
        }

        loop {
            let decision = player.decide(&table).await;
            let frame = encode_decision(&DecisionMessage { decision });
            self.with_deadline(stream.write_all(&frame)).await?;

            match decision {
                Decision::Hit => {
                    let payload = self.recv(stream).await?;
                    let card = require_card(&payload)?;
                    table.deal(Seat::Player, card);
                    player.card_dealt(Seat::Player, card);
                    if let Some(outcome) = payload.result.outcome() {
                        return Ok((outcome, table));
                    }
                }
                Decision::Stand => loop {
                    let payload = self.recv(stream).await?;
                    if let Some(outcome) = payload.result.outcome() {
                        return Ok((outcome, table));
                    }
                    let card = require_card(&payload)?;
                    table.deal(Seat::Dealer, card);
                    player.card_dealt(Seat::Dealer, card);
                },
            }
        }
    }

    async fn recv<S>(&self, stream: &mut S) -> Result<PayloadMessage, PlayError>
    where
        S: AsyncRead + Unpin,
    {
        let mut buf = [0u8; PAYLOAD_LEN];
        match self.with_deadline(stream.read_exact(&mut buf)).await {
            Ok(_) => Ok(decode_payload(&buf)?),
            Err(PlayError::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                Err(PlayError::Closed)
            }
            Err(e) => Err(e),
        }
    }

    async fn with_deadline<T, F>(&self, fut: F) -> Result<T, PlayError>
    where
        F: Future<Output = std::io::Result<T>>,
    {
        match self.io_timeout {
            Some(limit) => time::timeout(limit, fut)
                .await
                .map_err(|_| PlayError::TimedOut(limit))?
                .map_err(PlayError::from),
            None => fut.await.map_err(PlayError::from),
        }
    }
}

fn require_card(payload: &PayloadMessage) -> Result<Card, PlayError> {
    payload
        .dealt_card()
        .ok_or_else(|| PlayError::UnexpectedPayload(format!("no card in {payload:?}")))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
