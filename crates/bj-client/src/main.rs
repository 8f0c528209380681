//! LAN Blackjack player entry point.
//!
//! ```text
//! main()
//!  └─ loop
//!       ├─ prompt_rounds()       -- unless --rounds was given
//!       ├─ listen_for_offer()    -- UDP, first valid OFFER wins
//!       ├─ connect_to_server()   -- TCP to offer source IP : offer port
//!       └─ PlayRoundsUseCase     -- Request, rounds, tally
//! ```
//!
//! A failed session is logged and the client goes back to listening, unless
//! `--once` was given.  Ctrl-C ends the process at any point.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bj_client::application::{
    auto_player::AutoPlayer,
    play_rounds::{PlayRoundsUseCase, Player, SessionTally},
};
use bj_client::infrastructure::{
    console::ConsolePlayer,
    network::{connect_to_server, discovery::listen_for_offer},
};
use bj_core::domain::DEALER_STANDS_ON;
use bj_core::DISCOVERY_PORT;

/// LAN blackjack player.
#[derive(Debug, Parser)]
#[command(name = "bj-client", about = "LAN blackjack player client", version)]
struct Cli {
    /// Name sent to the dealer in the request.
    #[arg(long, env = "BJ_CLIENT_NAME", default_value = "Team 2")]
    name: String,

    /// Rounds per session (1-255); prompted for when omitted.
    #[arg(long, env = "BJ_ROUNDS", value_parser = clap::value_parser!(u8).range(1..))]
    rounds: Option<u8>,

    /// UDP port to listen on for offers.
    #[arg(long, env = "BJ_DISCOVERY_PORT", default_value_t = DISCOVERY_PORT)]
    discovery_port: u16,

    /// Play without prompting, hitting below `--hit-below`.
    #[arg(long)]
    auto: bool,

    /// Total below which the automatic player hits.
    #[arg(long, default_value_t = DEALER_STANDS_ON)]
    hit_below: u32,

    /// Exit after one session instead of looking for the next offer.
    #[arg(long)]
    once: bool,

    /// Per read deadline on the game connection, in seconds (0 disables).
    #[arg(long, env = "BJ_IO_TIMEOUT", default_value_t = 0)]
    io_timeout: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("LAN Blackjack client \"{}\" starting", cli.name);

    tokio::select! {
        result = run(&cli) => result?,
        _ = tokio::signal::ctrl_c() => info!("shutdown signal received"),
    }

    info!("LAN Blackjack client stopped");
    Ok(())
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let io_timeout = (cli.io_timeout > 0).then(|| Duration::from_secs(cli.io_timeout));
    let use_case = PlayRoundsUseCase::new(io_timeout);
    let mut console = ConsolePlayer::stdin();
    let mut auto = AutoPlayer::new(cli.hit_below);

    loop {
        let rounds = match cli.rounds {
            Some(rounds) => rounds,
            None => console.prompt_rounds().await.context("reading round count")?,
        };

        let offer = listen_for_offer(cli.discovery_port)
            .await
            .context("waiting for a server offer")?;

        let outcome = async {
            let stream = connect_to_server(offer.game_addr).await?;
            let player: &mut dyn Player = if cli.auto { &mut auto } else { &mut console };
            anyhow::Ok(use_case.play(stream, &cli.name, rounds, player).await?)
        }
        .await;

        match outcome {
            Ok(tally) => report(&tally),
            Err(e) => error!("session with \"{}\" failed: {e:#}", offer.server_name),
        }

        if cli.once {
            return Ok(());
        }
    }
}

fn report(tally: &SessionTally) {
    println!(
        "Finished playing {} rounds, win rate: {:.2} ({} won, {} lost, {} tied)",
        tally.rounds,
        tally.win_rate(),
        tally.wins,
        tally.losses,
        tally.ties
    );
}
