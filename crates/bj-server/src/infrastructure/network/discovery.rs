//! UDP broadcast of the server offer.
//!
//! The server encodes one OFFER frame at startup (its name plus the bound
//! TCP game port) and sends the same bytes to the broadcast address on the
//! discovery port once per interval.
//!
//! The broadcaster runs on a dedicated thread with a blocking socket.  A
//! failed send is logged and retried on the next tick; nothing else in the
//! server hears about it.  The loop only ends when `running` is cleared.

use std::net::{SocketAddr, UdpSocket};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::JoinHandle;
use std::time::Duration;

use bj_core::protocol::{encode_offer, OfferMessage, OFFER_LEN};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Error type for broadcaster startup.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The UDP socket could not be bound.
    #[error("failed to bind offer socket: {0}")]
    BindFailed(#[source] std::io::Error),
    /// The socket refused `SO_BROADCAST`.
    #[error("failed to enable broadcast: {0}")]
    BroadcastUnsupported(#[source] std::io::Error),
    /// The broadcaster thread could not be spawned.
    #[error("failed to spawn offer thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Binds an ephemeral UDP socket and spawns the offer loop.
///
/// The returned handle is normally never joined; tests join it after
/// clearing `running`.
///
/// # Errors
///
/// Returns [`DiscoveryError`] if the socket cannot be set up or the thread
/// cannot be spawned.
pub fn start_offer_broadcaster(
    offer: &OfferMessage,
    target: SocketAddr,
    interval: Duration,
    running: Arc<AtomicBool>,
) -> Result<JoinHandle<()>, DiscoveryError> {
    let socket = UdpSocket::bind("0.0.0.0:0").map_err(DiscoveryError::BindFailed)?;
    socket
        .set_broadcast(true)
        .map_err(DiscoveryError::BroadcastUnsupported)?;

    let frame = encode_offer(offer);
    let handle = std::thread::Builder::new()
        .name("bj-offer".to_string())
        .spawn(move || offer_loop(socket, frame, target, interval, running))
        .map_err(DiscoveryError::Spawn)?;

    info!(
        "broadcasting offers for \"{}\" (tcp port {}) to {target}",
        offer.server_name, offer.tcp_port
    );
    Ok(handle)
}

fn offer_loop(
    socket: UdpSocket,
    frame: [u8; OFFER_LEN],
    target: SocketAddr,
    interval: Duration,
    running: Arc<AtomicBool>,
) {
    while running.load(Ordering::Relaxed) {
        match socket.send_to(&frame, target) {
            Ok(_) => debug!("offer sent to {target}"),
            Err(e) => warn!("offer send to {target} failed: {e}"),
        }
        std::thread::sleep(interval);
    }
    info!("offer broadcaster stopped");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
