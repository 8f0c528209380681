//! UDP listener for server offers.
//!
//! The client binds the discovery port on all interfaces and waits for the
//! first datagram that decodes as an OFFER.  Anything else on the port
//! (wrong cookie, wrong kind, truncated frame) is logged at debug level and
//! skipped; only socket errors end the wait.
//!
//! The game address is the datagram's source IP combined with the TCP port
//! carried in the offer.

use std::net::{Ipv4Addr, SocketAddr};

use bj_core::protocol::decode_offer;
use thiserror::Error;
use tokio::net::UdpSocket;
use tracing::{debug, info};

/// Largest datagram we bother reading; offers are far smaller.
const RECV_BUF_LEN: usize = 1024;

/// Error type for the offer listener.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to bind discovery port {port}: {source}")]
    BindFailed {
        port: u16,
        #[source]
        source: std::io::Error,
    },
    #[error("discovery socket error: {0}")]
    Io(#[from] std::io::Error),
}

/// A server that answered on the discovery port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOffer {
    pub server_name: String,
    /// Where to open the TCP game connection.
    pub game_addr: SocketAddr,
}

/// Binds `0.0.0.0:port` and waits for the first valid offer.
///
/// The socket is dropped before returning, so the next session binds afresh.
///
/// # Errors
///
/// Returns [`DiscoveryError::BindFailed`] if the port is taken and
/// [`DiscoveryError::Io`] if receiving fails.
pub async fn listen_for_offer(port: u16) -> Result<ServerOffer, DiscoveryError> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, port))
        .await
        .map_err(|source| DiscoveryError::BindFailed { port, source })?;
    info!("listening for offers on UDP port {port}");
    wait_for_offer(&socket).await
}

/// Reads datagrams from `socket` until one decodes as an offer.
///
/// # Errors
///
/// Returns [`DiscoveryError::Io`] if receiving fails.
pub async fn wait_for_offer(socket: &UdpSocket) -> Result<ServerOffer, DiscoveryError> {
    let mut buf = [0u8; RECV_BUF_LEN];
    loop {
        let (n, from) = socket.recv_from(&mut buf).await?;
        match decode_offer(&buf[..n]) {
            Ok(offer) => {
                let game_addr = SocketAddr::new(from.ip(), offer.tcp_port);
                info!(
                    "received offer from \"{}\" at {}, connecting...",
                    offer.server_name,
                    from.ip()
                );
                return Ok(ServerOffer {
                    server_name: offer.server_name,
                    game_addr,
                });
            }
            Err(e) => debug!("ignoring datagram from {from}: {e}"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bj_core::protocol::{encode_offer, OfferMessage, MAGIC_COOKIE};

    #[tokio::test]
    async fn test_first_valid_offer_wins_after_noise() {
        // Arrange
        let listener = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = listener.local_addr().unwrap();
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let mut bad_cookie = encode_offer(&OfferMessage {
            tcp_port: 1,
            server_name: "impostor".to_string(),
        });
        bad_cookie[..4].copy_from_slice(&(MAGIC_COOKIE ^ 1).to_be_bytes());
        let good = encode_offer(&OfferMessage {
            tcp_port: 40123,
            server_name: "Team 1".to_string(),
        });

        // Act
        sender.send_to(b"hello", target).await.unwrap();
        sender.send_to(&bad_cookie, target).await.unwrap();
        sender.send_to(&good, target).await.unwrap();
        let offer = wait_for_offer(&listener).await.unwrap();

        // Assert
        assert_eq!(offer.server_name, "Team 1");
        assert_eq!(offer.game_addr, "127.0.0.1:40123".parse().unwrap());
    }

    #[tokio::test]
    async fn test_bind_conflict_is_reported() {
        let taken = std::net::UdpSocket::bind("0.0.0.0:0").unwrap();
        let port = taken.local_addr().unwrap().port();

        let err = listen_for_offer(port).await.unwrap_err();

        assert!(matches!(err, DiscoveryError::BindFailed { port: p, .. } if p == port));
    }
}
