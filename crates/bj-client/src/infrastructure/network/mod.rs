//! Network infrastructure for the client application.
//!
//! - **`discovery`** – waits on the discovery UDP port for a valid OFFER.
//! - The game connection itself is a plain [`TcpStream`] opened by
//!   [`connect_to_server`]; the play loop takes it by value and drops it
//!   when the session ends.

pub mod discovery;

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpStream;
use tracing::{info, warn};

/// Errors that can occur opening the game connection.
#[derive(Debug, Error)]
pub enum ClientNetworkError {
    /// TCP connection to the server failed.
    #[error("failed to connect to server at {addr}: {source}")]
    ConnectFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Opens the TCP game connection to an offering server.
///
/// # Errors
///
/// Returns [`ClientNetworkError::ConnectFailed`] if the connection is refused
/// or unreachable.
pub async fn connect_to_server(addr: SocketAddr) -> Result<TcpStream, ClientNetworkError> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|source| ClientNetworkError::ConnectFailed { addr, source })?;
    // Frames are tiny and strictly request/response.
    if let Err(e) = stream.set_nodelay(true) {
        warn!("could not disable Nagle on {addr}: {e}");
    }
    info!("connected to server at {addr}");
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connect_to_listening_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (client, accepted) = tokio::join!(connect_to_server(addr), listener.accept());

        assert!(client.is_ok());
        assert!(accepted.is_ok());
    }

    #[tokio::test]
    async fn test_connect_refused_reports_address() {
        // Arrange: bind then drop to obtain a port nobody listens on
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };

        // Act
        let err = connect_to_server(addr).await.unwrap_err();

        // Assert
        let ClientNetworkError::ConnectFailed { addr: failed, .. } = err;
        assert_eq!(failed, addr);
    }
}
