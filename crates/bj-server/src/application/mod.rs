//! Application layer: use cases for the server.
//!
//! - **`play_session`** – Reads the client's Request, plays the requested
//!   rounds with the round engine, and streams Payload frames back.

pub mod play_session;
