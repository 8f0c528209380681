//! LAN Blackjack dealer entry point.
//!
//! Loads configuration, binds the game listener on an ephemeral TCP port,
//! starts the offer broadcaster for that port, and accepts sessions until
//! Ctrl-C.
//!
//! ```text
//! main()
//!  └─ load_config()             -- TOML file + CLI overrides
//!  └─ bind_game_listener()      -- TCP, port advertised in the offer
//!  └─ start_offer_broadcaster() -- UDP background thread
//!  └─ serve()                   -- one Tokio task per client session
//! ```

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bj_core::domain::{CardSampler, SeededSampler, ThreadRngSampler};
use bj_core::protocol::OfferMessage;
use bj_server::application::play_session::PlaySessionUseCase;
use bj_server::infrastructure::network::{discovery, game_listener};
use bj_server::infrastructure::storage::config::{load_config, ServerConfig};

/// LAN blackjack dealer.
#[derive(Debug, Parser)]
#[command(name = "bj-server", about = "LAN blackjack dealer server", version)]
struct Cli {
    /// Path to a TOML config file; defaults to the platform config directory.
    #[arg(long, env = "BJ_CONFIG")]
    config: Option<PathBuf>,

    /// Server name advertised in offers.
    #[arg(long, env = "BJ_SERVER_NAME")]
    name: Option<String>,

    /// UDP port offers are broadcast to.
    #[arg(long, env = "BJ_DISCOVERY_PORT")]
    discovery_port: Option<u16>,

    /// Per read/write deadline on game connections, in seconds (0 disables).
    #[arg(long, env = "BJ_IO_TIMEOUT")]
    io_timeout: Option<u64>,

    /// Seed for reproducible card draws.
    #[arg(long, env = "BJ_SEED")]
    seed: Option<u64>,
}

impl Cli {
    fn apply(&self, cfg: &mut ServerConfig) {
        if let Some(name) = &self.name {
            cfg.server.name = name.clone();
        }
        if let Some(port) = self.discovery_port {
            cfg.network.discovery_port = port;
        }
        if let Some(secs) = self.io_timeout {
            cfg.network.io_timeout_secs = secs;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = load_config(cli.config.as_deref()).context("loading server config")?;
    cli.apply(&mut cfg);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.server.log_level)),
        )
        .init();

    info!("LAN Blackjack server \"{}\" starting", cfg.server.name);

    let listener = game_listener::bind_game_listener(cfg.network.game_bind_addr()?)
        .await
        .context("binding game listener")?;
    let local = listener.local_addr().context("reading game listener address")?;
    info!("game listener on {local}");

    let running = Arc::new(AtomicBool::new(true));
    let offer = OfferMessage {
        tcp_port: local.port(),
        server_name: cfg.server.name.clone(),
    };
    // Never joined: the thread lives as long as the process.
    let _broadcaster = discovery::start_offer_broadcaster(
        &offer,
        cfg.network.broadcast_target()?,
        cfg.network.offer_interval(),
        Arc::clone(&running),
    )
    .context("starting offer broadcaster")?;

    let sampler: Arc<dyn CardSampler> = match cli.seed {
        Some(seed) => Arc::new(SeededSampler::new(seed)),
        None => Arc::new(ThreadRngSampler),
    };
    let use_case = Arc::new(PlaySessionUseCase::new(sampler, cfg.network.io_timeout()));

    tokio::select! {
        _ = game_listener::serve(listener, use_case) => {}
        _ = tokio::signal::ctrl_c() => info!("shutdown signal received"),
    }

    running.store(false, Ordering::Relaxed);
    info!("LAN Blackjack server stopped");
    Ok(())
}
