//! End-to-end tests: the client play loop against the real dealer session,
//! and the client offer listener against the real broadcaster.
//!
//! The dealer draws from a scripted sampler in deal order (player, player,
//! dealer up, dealer hole, then hits and dealer draws), so every round's
//! outcome is fixed in advance.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use bj_client::application::{
    auto_player::AutoPlayer,
    play_rounds::{PlayRoundsUseCase, SessionTally},
};
use bj_client::infrastructure::network::discovery::wait_for_offer;
use bj_core::domain::{Card, ScriptedSampler, Suit};
use bj_core::protocol::OfferMessage;
use bj_server::application::play_session::{PlaySessionUseCase, SessionSummary};
use bj_server::infrastructure::network::discovery::start_offer_broadcaster;
use tokio::net::UdpSocket;

fn cards(ranks: &[u8]) -> Vec<Card> {
    ranks
        .iter()
        .map(|&r| Card::new(r, Suit::Diamonds).unwrap())
        .collect()
}

async fn play(script: &[u8], rounds: u8, mut player: AutoPlayer) -> (SessionTally, SessionSummary) {
    let dealer = PlaySessionUseCase::new(
        Arc::new(ScriptedSampler::new(cards(script))),
        Some(Duration::from_secs(5)),
    );
    let client = PlayRoundsUseCase::new(Some(Duration::from_secs(5)));
    let (client_end, server_end) = tokio::io::duplex(256);

    let (tally, summary) = tokio::join!(
        client.play(client_end, "Team 2", rounds, &mut player),
        dealer.run(server_end),
    );
    (tally.expect("client"), summary.expect("server"))
}

#[tokio::test]
async fn test_hit_to_twenty_one_then_stand_wins() {
    // Arrange: player 10 + 6, dealer 9 up / 8 hole, hit draws 5
    let script = [10, 6, 9, 8, 5];

    // Act
    let (tally, summary) = play(&script, 1, AutoPlayer::default()).await;

    // Assert
    assert_eq!((tally.rounds, tally.wins), (1, 1));
    assert_eq!(summary.wins, 1);
    assert_eq!(summary.client_name, "Team 2");
}

#[tokio::test]
async fn test_bust_is_a_loss_on_both_sides() {
    // Always-hit player busts on 10 + 9 + 5
    let script = [10, 9, 7, 4, 5];

    let (tally, summary) = play(&script, 1, AutoPlayer::new(22)).await;

    assert_eq!(tally.losses, 1);
    assert_eq!(summary.losses, 1);
    assert_eq!(summary.rounds_played, 1);
}

#[tokio::test]
async fn test_tallies_agree_over_several_rounds() {
    // Round 1: 10 + 8 stands vs 10 + 8 -> tie.
    // Round 2: A + K stands vs 10 + 6, dealer draws 10 -> dealer busts, win.
    // Round 3: 10 + 7 stands vs 10 + 10 -> loss.
    let script = [10, 8, 10, 8, 1, 13, 10, 6, 10, 10, 7, 10, 10];

    let (tally, summary) = play(&script, 3, AutoPlayer::default()).await;

    assert_eq!((tally.wins, tally.losses, tally.ties), (1, 1, 1));
    assert_eq!(
        (summary.wins, summary.losses, summary.ties),
        (tally.wins, tally.losses, tally.ties)
    );
}

#[tokio::test]
async fn test_zero_rounds_ends_cleanly() {
    let (tally, summary) = play(&[], 0, AutoPlayer::default()).await;

    assert_eq!(tally, SessionTally::default());
    assert_eq!(summary.rounds_played, 0);
}

#[tokio::test]
async fn test_client_finds_broadcast_offer() {
    // Arrange: loopback socket in place of the discovery port
    let listener = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let target = listener.local_addr().unwrap();
    let running = Arc::new(AtomicBool::new(true));
    let offer = OfferMessage {
        tcp_port: 50505,
        server_name: "Team 1".to_string(),
    };

    // Act
    let handle =
        start_offer_broadcaster(&offer, target, Duration::from_millis(20), Arc::clone(&running))
            .expect("broadcaster");
    let found = tokio::time::timeout(Duration::from_secs(5), wait_for_offer(&listener))
        .await
        .expect("offer in time")
        .expect("offer");
    running.store(false, Ordering::Relaxed);
    handle.join().expect("join");

    // Assert
    assert_eq!(found.server_name, "Team 1");
    assert_eq!(found.game_addr.port(), 50505);
    assert!(found.game_addr.ip().is_loopback());
}

#[tokio::test]
async fn test_dealt_aces_lose_on_both_sides_without_a_decision() {
    // A + A is 22; the second round is played normally
    let script = [1, 1, 10, 10, 10, 9, 10, 7];

    let (tally, summary) = play(&script, 2, AutoPlayer::default()).await;

    assert_eq!((tally.losses, tally.wins), (1, 1));
    assert_eq!((summary.losses, summary.wins), (1, 1));
}
