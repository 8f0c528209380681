//! PlaySessionUseCase: drives one client connection from Request to close.
//!
//! Sequence on the wire for each requested round:
//!
//! ```text
//! server → PAYLOAD  player card 1, player card 2, dealer up card
//!        [PAYLOAD  loss sentinel, if the deal already busted the player]
//! loop:
//!   client → DECISION
//!   server → PAYLOAD  hit card            (Continue, or Loss on bust)
//!        or PAYLOAD  hole card, dealer draws..., outcome sentinel
//! ```
//!
//! Any short read, decode failure, or write failure ends the session; the
//! stream is dropped (and so closed) by the caller.  Rounds are independent:
//! a fresh [`Round`] is dealt for each one.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bj_core::domain::{CardSampler, Outcome, Round, RoundError, RoundEvent};
use bj_core::protocol::{
    decode_decision, decode_request, encode_payload, DecisionMessage, PayloadMessage,
    ProtocolError, DECISION_LEN, REQUEST_LEN,
};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time;
use tracing::{debug, info};

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The connection failed while reading or writing.
    #[error("connection I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The client closed the connection in the middle of a frame or round.
    #[error("connection closed by client")]
    Closed,
    /// The client sent a frame that does not decode.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    /// The round was driven out of order.
    #[error("round error: {0}")]
    Round(#[from] RoundError),
    /// The client did not complete a read or write within the deadline.
    #[error("client timed out after {0:?}")]
    TimedOut(Duration),
}

/// What a finished session amounted to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub client_name: String,
    pub rounds_requested: u8,
    pub rounds_played: u8,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl SessionSummary {
    fn record(&mut self, outcome: Outcome) {
        self.rounds_played += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Tie => self.ties += 1,
        }
    }
}

/// The Play Session use case.
///
/// One instance is shared by all connection workers; each call to
/// [`PlaySessionUseCase::run`] owns its stream exclusively.
pub struct PlaySessionUseCase {
    sampler: Arc<dyn CardSampler>,
    io_timeout: Option<Duration>,
}

impl PlaySessionUseCase {
    /// `io_timeout` bounds every individual read and write; `None` waits
    /// forever.
    pub fn new(sampler: Arc<dyn CardSampler>, io_timeout: Option<Duration>) -> Self {
        Self {
            sampler,
            io_timeout,
        }
    }

    /// Runs a whole session over `stream` and shuts down the write side when
    /// every requested round has been played.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] on the first transport or protocol failure.
    pub async fn run<S>(&self, mut stream: S) -> Result<SessionSummary, SessionError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let frame: [u8; REQUEST_LEN] = self.read_frame(&mut stream).await?;
        let request = decode_request(&frame)?;
        info!(
            client = %request.client_name,
            rounds = request.rounds,
            "session request accepted"
        );

        let mut summary = SessionSummary {
            client_name: request.client_name,
            rounds_requested: request.rounds,
            ..SessionSummary::default()
        };

        for round_no in 1..=request.rounds {
            let outcome = self.play_round(&mut stream).await?;
            debug!(round = round_no, ?outcome, "round finished");
            summary.record(outcome);
        }

        self.with_deadline(stream.shutdown()).await?;
        Ok(summary)
    }

    async fn play_round<S>(&self, stream: &mut S) -> Result<Outcome, SessionError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let sampler = self.sampler.as_ref();
        let mut round = Round::deal(sampler);
        self.send_events(stream, &round.opening_events()).await?;

        loop {
            if let Some(outcome) = round.outcome() {
                return Ok(outcome);
            }
            let frame: [u8; DECISION_LEN] = self.read_frame(stream).await?;
            let DecisionMessage { decision } = decode_decision(&frame)?;
            debug!(?decision, total = round.player().total(), "player decision");
            let events = round.apply(decision, sampler)?;
            self.send_events(stream, &events).await?;
        }
    }

    async fn send_events<S>(&self, stream: &mut S, events: &[RoundEvent]) -> Result<(), SessionError>
    where
        S: AsyncWrite + Unpin,
    {
        for event in events {
            let bytes = encode_payload(&PayloadMessage::from(event));
            self.with_deadline(stream.write_all(&bytes)).await?;
        }
        self.with_deadline(stream.flush()).await
    }

    async fn read_frame<S, const N: usize>(&self, stream: &mut S) -> Result<[u8; N], SessionError>
    where
        S: AsyncRead + Unpin,
    {
        let mut buf = [0u8; N];
        match self.with_deadline(stream.read_exact(&mut buf)).await {
            Ok(_) => Ok(buf),
            Err(SessionError::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                Err(SessionError::Closed)
            }
            Err(e) => Err(e),
        }
    }

    async fn with_deadline<T, F>(&self, fut: F) -> Result<T, SessionError>
    where
        F: Future<Output = std::io::Result<T>>,
    {
        match self.io_timeout {
            Some(limit) => time::timeout(limit, fut)
                .await
                .map_err(|_| SessionError::TimedOut(limit))?
                .map_err(SessionError::from),
            None => fut.await.map_err(SessionError::from),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
