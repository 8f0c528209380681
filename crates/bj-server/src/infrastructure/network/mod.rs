//! Network infrastructure for the server application.
//!
//! - **`discovery`** – Broadcasts the pre-encoded OFFER frame on the LAN so
//!   clients can find the game port without manual configuration.
//!
//! - **`game_listener`** – Accepts TCP game connections and runs one
//!   session task per client.

pub mod discovery;
pub mod game_listener;
