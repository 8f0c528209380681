//! Application layer use cases for the client application.
//!
//! - **`play_rounds`** – Drives one session over an established game stream:
//!   sends the Request, attributes each PAYLOAD card to the player or the
//!   dealer, asks a [`play_rounds::Player`] for every decision, and tallies
//!   the outcomes.
//!
//! - **`auto_player`** – A [`play_rounds::Player`] that hits below a fixed
//!   total, for unattended play.

pub mod auto_player;
pub mod play_rounds;
