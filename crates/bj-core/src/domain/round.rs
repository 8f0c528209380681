//! One round of blackjack, from the deal to the outcome.
//!
//! # State machine
//!
//! ```text
//! deal() ──(total > 21)──► Resolved (Loss, player_busted)
//!   │
//!   ▼
//! PlayerTurn ──hit (total ≤ 21)──► PlayerTurn
//!  │  └──────hit (total > 21)──► Resolved (Loss, player_busted)
//!  └─stand──► DealerTurn ──draw while < 17──► Resolved
//! ```
//!
//! Dealing draws two player cards, then two dealer cards.  Only the first
//! dealer card is announced by the opening events; the second ("hole" card)
//! is revealed when the dealer turn starts.  With Aces fixed at 11 a dealt
//! pair of Aces totals 22: that player is bust on the deal and the round
//! resolves as a loss before any decision.  The dealer keeps drawing while
//! its total is below [`DEALER_STANDS_ON`] and never checks for a bust
//! inside that loop, so a dealer total above 21 simply ends the loop.
//!
//! Every mutation returns the [`RoundEvent`]s it produced, in order, so the
//! caller can forward them to the peer.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::card::Card;
use crate::domain::hand::{Hand, BLACKJACK};
use crate::domain::sampler::CardSampler;

/// The dealer draws while its total is below this value.
pub const DEALER_STANDS_ON: u32 = 17;

/// Where a round currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    PlayerTurn,
    DealerTurn,
    Resolved,
}

/// Final result of a round, from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Tie,
    Loss,
    Win,
}

/// The player's in-round choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Hit,
    Stand,
}

/// Something the peer must be told about, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEvent {
    /// A card added to the player's hand that did not bust it.
    PlayerCard(Card),
    /// A dealer card made visible: the up card, the hole card, or a draw.
    DealerCard(Card),
    /// The hit card that pushed the player over 21.  Ends the round as a loss.
    PlayerBust(Card),
    /// Final comparison after the dealer turn.
    Resolved(Outcome),
}

/// Errors raised when a round is driven out of order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundError {
    #[error("cannot {action} during {phase:?}")]
    OutOfTurn { action: &'static str, phase: Phase },
}

/// Decides the outcome once the player has stood without busting.
///
/// A dealer bust wins for the player; otherwise the higher total wins and
/// equal totals tie.
pub fn resolve(player_total: u32, dealer_total: u32) -> Outcome {
    if dealer_total > BLACKJACK || player_total > dealer_total {
        Outcome::Win
    } else if player_total < dealer_total {
        Outcome::Loss
    } else {
        Outcome::Tie
    }
}

/// State of a single round.
#[derive(Debug, Clone)]
pub struct Round {
    player: Hand,
    dealer: Hand,
    phase: Phase,
    outcome: Option<Outcome>,
    player_busted: bool,
}

impl Round {
    /// Deals two player cards and two dealer cards and enters the player turn.
    pub fn deal(sampler: &dyn CardSampler) -> Self {
        let mut player = Hand::new();
        let mut dealer = Hand::new();
        player.push(sampler.draw());
        player.push(sampler.draw());
        dealer.push(sampler.draw());
        dealer.push(sampler.draw());
        debug!(
            player_total = player.total(),
            dealer_total = dealer.total(),
            "round dealt"
        );
        let mut round = Self {
            player,
            dealer,
            phase: Phase::PlayerTurn,
            outcome: None,
            player_busted: false,
        };
        if round.player.is_bust() {
            round.player_busted = true;
            round.finish(Outcome::Loss);
        }
        round
    }

    /// Events announcing the deal: both player cards, then the dealer's up
    /// card.  The hole card is withheld.  A player bust on the deal appends
    /// the final [`RoundEvent::Resolved`] loss.
    pub fn opening_events(&self) -> Vec<RoundEvent> {
        let p = self.player.cards();
        let mut events = vec![
            RoundEvent::PlayerCard(p[0]),
            RoundEvent::PlayerCard(p[1]),
            RoundEvent::DealerCard(self.dealer.cards()[0]),
        ];
        if let Some(outcome) = self.outcome {
            events.push(RoundEvent::Resolved(outcome));
        }
        events
    }

    /// Applies a player decision.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError::OutOfTurn`] unless the round is in the player turn.
    pub fn apply(
        &mut self,
        decision: Decision,
        sampler: &dyn CardSampler,
    ) -> Result<Vec<RoundEvent>, RoundError> {
        match decision {
            Decision::Hit => self.hit(sampler).map(|e| vec![e]),
            Decision::Stand => self.stand(sampler),
        }
    }

    /// Draws one card for the player.  A total above 21 busts the player and
    /// resolves the round as a loss without a dealer turn.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError::OutOfTurn`] unless the round is in the player turn.
    pub fn hit(&mut self, sampler: &dyn CardSampler) -> Result<RoundEvent, RoundError> {
        self.expect_player_turn("hit")?;
        let card = sampler.draw();
        self.player.push(card);
        if self.player.is_bust() {
            self.player_busted = true;
            self.finish(Outcome::Loss);
            Ok(RoundEvent::PlayerBust(card))
        } else {
            Ok(RoundEvent::PlayerCard(card))
        }
    }

    /// Ends the player turn, plays out the dealer turn, and resolves.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError::OutOfTurn`] unless the round is in the player turn.
    pub fn stand(&mut self, sampler: &dyn CardSampler) -> Result<Vec<RoundEvent>, RoundError> {
        self.expect_player_turn("stand")?;
        self.phase = Phase::DealerTurn;

        let mut events = vec![RoundEvent::DealerCard(self.dealer.cards()[1])];
        while self.dealer.total() < DEALER_STANDS_ON {
            let card = sampler.draw();
            self.dealer.push(card);
            events.push(RoundEvent::DealerCard(card));
        }

        let outcome = resolve(self.player.total(), self.dealer.total());
        self.finish(outcome);
        events.push(RoundEvent::Resolved(outcome));
        Ok(events)
    }

    pub fn player(&self) -> &Hand {
        &self.player
    }

    /// The dealer's full hand, including the hole card even before it is
    /// revealed.
    pub fn dealer(&self) -> &Hand {
        &self.dealer
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// `None` while the round is pending.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn player_busted(&self) -> bool {
        self.player_busted
    }

    pub fn is_resolved(&self) -> bool {
        self.phase == Phase::Resolved
    }

    fn expect_player_turn(&self, action: &'static str) -> Result<(), RoundError> {
        if self.phase == Phase::PlayerTurn {
            Ok(())
        } else {
            Err(RoundError::OutOfTurn {
                action,
                phase: self.phase,
            })
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        debug!(
            ?outcome,
            player_total = self.player.total(),
            dealer_total = self.dealer.total(),
            "round resolved"
        );
        self.phase = Phase::Resolved;
        self.outcome = Some(outcome);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
