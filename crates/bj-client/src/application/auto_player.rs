//! Unattended player: hits while its total is below a threshold.

use async_trait::async_trait;
use bj_core::domain::{Card, Decision, Outcome, DEALER_STANDS_ON};
use tracing::info;

use crate::application::play_rounds::{Player, Seat, TableView};

/// Plays the dealer's own rule by default: hit below 17, stand otherwise.
#[derive(Debug, Clone, Copy)]
pub struct AutoPlayer {
    hit_below: u32,
}

impl AutoPlayer {
    pub fn new(hit_below: u32) -> Self {
        Self { hit_below }
    }
}

impl Default for AutoPlayer {
    fn default() -> Self {
        Self::new(DEALER_STANDS_ON)
    }
}

#[async_trait]
impl Player for AutoPlayer {
    async fn decide(&mut self, table: &TableView) -> Decision {
        if table.player.total() < self.hit_below {
            Decision::Hit
        } else {
            Decision::Stand
        }
    }

    fn card_dealt(&mut self, seat: Seat, card: Card) {
        info!(?seat, "{card}");
    }

    fn round_finished(&mut self, outcome: Outcome, table: &TableView) {
        info!(
            player = table.player.total(),
            dealer = table.dealer.total(),
            ?outcome,
            "round over"
        );
    }
}
