//! bj-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! The client is the player side of LAN blackjack:
//!
//! 1. Listens on the discovery UDP port for a server OFFER.
//! 2. Connects to the advertised TCP game port and sends a REQUEST with the
//!    number of rounds it wants.
//! 3. For every round, reads the dealt cards, answers Hit or Stand until the
//!    round ends, and records the outcome.
//! 4. Prints the session tally and goes back to listening for offers.

/// Application layer: the play loop and player strategies.
pub mod application;

/// Infrastructure layer: network I/O and the console.
pub mod infrastructure;
