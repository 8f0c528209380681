//! Playing cards and their blackjack values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest valid rank (Ace).
pub const ACE: u8 = 1;

/// Highest valid rank (King).
pub const KING: u8 = 13;

/// Card suit, encoded on the wire as 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Hearts = 0,
    Diamonds = 1,
    Clubs = 2,
    Spades = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];
}

impl TryFrom<u8> for Suit {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Suit::ALL.get(usize::from(value)).copied().ok_or(())
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Suit::Hearts => "Hearts",
            Suit::Diamonds => "Diamonds",
            Suit::Clubs => "Clubs",
            Suit::Spades => "Spades",
        };
        f.write_str(name)
    }
}

/// A single card.  Rank 1 is the Ace, 11/12/13 are Jack/Queen/King.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: u8,
    suit: Suit,
}

impl Card {
    /// Returns `None` when `rank` is outside `1..=13`.
    pub fn new(rank: u8, suit: Suit) -> Option<Self> {
        (ACE..=KING).contains(&rank).then_some(Self { rank, suit })
    }

    /// Constructor for callers that already guarantee `1..=13`.
    pub(crate) fn from_sample(rank: u8, suit: Suit) -> Self {
        debug_assert!((ACE..=KING).contains(&rank));
        Self { rank, suit }
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Blackjack value.  The Ace is always 11; there is no soft-hand
    /// adjustment to 1.
    pub fn value(&self) -> u32 {
        match self.rank {
            ACE => 11,
            10..=KING => 10,
            r => u32::from(r),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rank {
            ACE => write!(f, "Ace of {}", self.suit),
            11 => write!(f, "Jack of {}", self.suit),
            12 => write!(f, "Queen of {}", self.suit),
            KING => write!(f, "King of {}", self.suit),
            r => write!(f, "{r} of {}", self.suit),
        }
    }
}
