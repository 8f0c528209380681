//! Pure game logic: cards, hands, the round state machine, and card sampling.
//!
//! Nothing here touches sockets or the console.

pub mod card;
pub mod hand;
pub mod round;
pub mod sampler;

pub use card::{Card, Suit};
pub use hand::{Hand, BLACKJACK};
pub use round::{resolve, Decision, Outcome, Phase, Round, RoundError, RoundEvent, DEALER_STANDS_ON};
pub use sampler::{CardSampler, ScriptedSampler, SeededSampler, ThreadRngSampler};
