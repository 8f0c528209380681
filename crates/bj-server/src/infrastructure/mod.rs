//! Infrastructure layer: sockets and configuration files.

pub mod network;
pub mod storage;
