//! Card sampling services.
//!
//! Cards are drawn by independent uniform sampling with replacement: rank
//! uniform in `1..=13`, suit uniform in `0..=3`.  There is no finite deck,
//! so the same card may appear any number of times within and across hands.
//!
//! A [`CardSampler`] is shared by every session worker on the server, so
//! implementations must be `Send + Sync` and `draw` takes `&self`.

use std::collections::VecDeque;
use std::sync::Mutex;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::domain::card::{Card, Suit, ACE, KING};

/// Source of independently sampled cards.
#[cfg_attr(test, mockall::automock)]
pub trait CardSampler: Send + Sync {
    /// Draws one card.
    fn draw(&self) -> Card;
}

/// Draws a uniformly random card from `rng`.
pub fn sample_card<R: Rng + ?Sized>(rng: &mut R) -> Card {
    let rank = rng.gen_range(ACE..=KING);
    let suit = Suit::ALL[rng.gen_range(0..Suit::ALL.len())];
    Card::from_sample(rank, suit)
}

/// Production sampler backed by the calling thread's RNG.
///
/// Each worker thread owns its own generator, so concurrent draws never
/// contend on a lock.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSampler;

impl CardSampler for ThreadRngSampler {
    fn draw(&self) -> Card {
        sample_card(&mut rand::thread_rng())
    }
}

/// Reproducible sampler: a single seeded generator behind a mutex.
#[derive(Debug)]
pub struct SeededSampler {
    rng: Mutex<StdRng>,
}

impl SeededSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl CardSampler for SeededSampler {
    fn draw(&self) -> Card {
        // A panic while holding the lock cannot leave the RNG in a bad state.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        sample_card(&mut *rng)
    }
}

/// Plays back a fixed script of cards, then falls back to seeded sampling
/// once the script is exhausted.
#[derive(Debug)]
pub struct ScriptedSampler {
    script: Mutex<VecDeque<Card>>,
    fallback: SeededSampler,
}

impl ScriptedSampler {
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            script: Mutex::new(cards.into_iter().collect()),
            fallback: SeededSampler::new(0),
        }
    }

    /// Number of scripted cards not yet drawn.
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl CardSampler for ScriptedSampler {
    fn draw(&self) -> Card {
        let next = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        next.unwrap_or_else(|| self.fallback.draw())
    }
}
