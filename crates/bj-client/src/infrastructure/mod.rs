//! Infrastructure layer for the client application.
//!
//! **Dependency rule**: this layer may depend on `application` and `bj_core`,
//! but MUST NOT be imported by the `application` layer.
//!
//! - **`network`** – UDP offer listener and the TCP game connection.
//! - **`console`** – Interactive [`Player`](crate::application::play_rounds::Player)
//!   on stdin/stdout.

pub mod console;
pub mod network;
