//! An ordered hand of cards with its running blackjack total.

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;

/// Highest total that is not a bust.
pub const BLACKJACK: u32 = 21;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
    total: u32,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `card` and returns the new total.
    pub fn push(&mut self, card: Card) -> u32 {
        self.cards.push(card);
        self.total += card.value();
        self.total
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_bust(&self) -> bool {
        self.total > BLACKJACK
    }
}
