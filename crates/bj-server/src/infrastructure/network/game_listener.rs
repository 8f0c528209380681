//! TCP accept loop for game sessions.
//!
//! The accept loop owns the listening socket.  Every accepted connection is
//! handed to its own Tokio task, which owns the stream for the lifetime of
//! the session and drops it (closing the connection) when the session ends
//! for any reason.  Sessions share nothing but the [`PlaySessionUseCase`]
//! and, through it, the card sampler.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::application::play_session::PlaySessionUseCase;

/// Error type for listener setup.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("failed to bind game listener on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Binds the game listener.  Port `0` picks an ephemeral port; read it back
/// with [`TcpListener::local_addr`].
///
/// # Errors
///
/// Returns [`ListenerError::BindFailed`] if the address cannot be bound.
pub async fn bind_game_listener(addr: SocketAddr) -> Result<TcpListener, ListenerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ListenerError::BindFailed { addr, source })
}

/// Accepts connections forever, spawning one session task per connection.
///
/// Accept errors are logged and the loop keeps going.
pub async fn serve(listener: TcpListener, use_case: Arc<PlaySessionUseCase>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => spawn_session(stream, peer, Arc::clone(&use_case)),
            Err(e) => warn!("accept failed: {e}"),
        }
    }
}

fn spawn_session(stream: TcpStream, peer: SocketAddr, use_case: Arc<PlaySessionUseCase>) {
    let span = info_span!("session", id = %Uuid::new_v4(), %peer);
    tokio::spawn(
        async move {
            info!("client connected");
            match use_case.run(stream).await {
                Ok(summary) => info!(
                    client = %summary.client_name,
                    played = summary.rounds_played,
                    wins = summary.wins,
                    losses = summary.losses,
                    ties = summary.ties,
                    "session complete"
                ),
                Err(e) => error!("session ended: {e}"),
            }
        }
        .instrument(span),
    );
}
