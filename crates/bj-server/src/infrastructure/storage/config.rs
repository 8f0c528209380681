//! TOML-based configuration for the dealer server.
//!
//! Read from an explicit path (`--config`) or from the platform-appropriate
//! config file:
//! - Windows:  `%APPDATA%\Blackjack\server.toml`
//! - Linux:    `~/.config/blackjack/server.toml`
//! - macOS:    `~/Library/Application Support/Blackjack/server.toml`
//!
//! ```toml
//! [server]
//! name = "Team 1"
//! log_level = "info"
//!
//! [network]
//! bind_address = "0.0.0.0"
//! tcp_port = 0
//! discovery_port = 13122
//! broadcast_address = "255.255.255.255"
//! offer_interval_ms = 1000
//! io_timeout_secs = 0
//! ```
//!
//! Every field has a serde default, so a missing file or a partial file still
//! yields a complete [`ServerConfig`].

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use bj_core::DISCOVERY_PORT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// An address field is not a valid IP address.
    #[error("invalid address {0:?}")]
    InvalidAddress(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub network: NetworkConfig,
}

/// Identity and logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// Name advertised in every offer.
    #[serde(default = "default_name")]
    pub name: String,
    /// `tracing` level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Sockets, discovery, and deadlines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// IP address the game listener binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// TCP game port; `0` lets the OS pick an ephemeral port.
    #[serde(default)]
    pub tcp_port: u16,
    /// UDP port offers are broadcast to.
    #[serde(default = "default_discovery_port")]
    pub discovery_port: u16,
    /// Destination address of offer datagrams.
    #[serde(default = "default_broadcast_address")]
    pub broadcast_address: String,
    /// Delay between two offers.
    #[serde(default = "default_offer_interval_ms")]
    pub offer_interval_ms: u64,
    /// Per read/write deadline on game connections; `0` disables it.
    #[serde(default)]
    pub io_timeout_secs: u64,
}

fn default_name() -> String {
    "Team 1".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_discovery_port() -> u16 {
    DISCOVERY_PORT
}
fn default_broadcast_address() -> String {
    "255.255.255.255".to_string()
}
fn default_offer_interval_ms() -> u64 {
    1000
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            tcp_port: 0,
            discovery_port: default_discovery_port(),
            broadcast_address: default_broadcast_address(),
            offer_interval_ms: default_offer_interval_ms(),
            io_timeout_secs: 0,
        }
    }
}

impl NetworkConfig {
    /// Address for the TCP game listener.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] if `bind_address` is not an IP.
    pub fn game_bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(SocketAddr::new(parse_ip(&self.bind_address)?, self.tcp_port))
    }

    /// Destination of offer datagrams.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] if `broadcast_address` is not
    /// an IP.
    pub fn broadcast_target(&self) -> Result<SocketAddr, ConfigError> {
        Ok(SocketAddr::new(
            parse_ip(&self.broadcast_address)?,
            self.discovery_port,
        ))
    }

    pub fn offer_interval(&self) -> Duration {
        Duration::from_millis(self.offer_interval_ms)
    }

    /// `None` when deadlines are disabled.
    pub fn io_timeout(&self) -> Option<Duration> {
        (self.io_timeout_secs > 0).then(|| Duration::from_secs(self.io_timeout_secs))
    }
}

fn parse_ip(s: &str) -> Result<IpAddr, ConfigError> {
    s.parse()
        .map_err(|_| ConfigError::InvalidAddress(s.to_string()))
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Resolves the platform config file path.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the base directory cannot
/// be determined from the environment.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("server.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads the config from `path`, or from the platform location when `path`
/// is `None`.  A missing file yields [`ServerConfig::default()`].
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_file_path() {
            Ok(p) => p,
            Err(ConfigError::NoPlatformConfigDir) => return Ok(ServerConfig::default()),
            Err(e) => return Err(e),
        },
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ServerConfig::default()),
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Blackjack"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("blackjack"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Blackjack")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        // Arrange / Act
        let cfg = ServerConfig::default();

        // Assert
        assert_eq!(cfg.server.name, "Team 1");
        assert_eq!(cfg.server.log_level, "info");
        assert_eq!(cfg.network.discovery_port, 13122);
        assert_eq!(cfg.network.tcp_port, 0);
        assert_eq!(cfg.network.offer_interval(), Duration::from_secs(1));
        assert_eq!(cfg.network.io_timeout(), None);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let cfg: ServerConfig = toml::from_str(
            r#"
            [server]
            name = "Dealer Dan"

            [network]
            io_timeout_secs = 30
            "#,
        )
        .expect("parse");

        assert_eq!(cfg.server.name, "Dealer Dan");
        assert_eq!(cfg.server.log_level, "info");
        assert_eq!(cfg.network.discovery_port, 13122);
        assert_eq!(cfg.network.io_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_empty_toml_is_default() {
        let cfg: ServerConfig = toml::from_str("").expect("parse");
        assert_eq!(cfg, ServerConfig::default());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let mut cfg = ServerConfig::default();
        cfg.network.tcp_port = 4000;
        cfg.server.name = "x".to_string();

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let restored: ServerConfig = toml::from_str(&text).expect("deserialize");

        assert_eq!(cfg, restored);
    }

    #[test]
    fn test_addresses_resolve() {
        let net = NetworkConfig::default();
        assert_eq!(net.game_bind_addr().unwrap().to_string(), "0.0.0.0:0");
        assert_eq!(
            net.broadcast_target().unwrap().to_string(),
            "255.255.255.255:13122"
        );
    }

    #[test]
    fn test_invalid_broadcast_address_is_rejected() {
        let net = NetworkConfig {
            broadcast_address: "not-an-ip".to_string(),
            ..NetworkConfig::default()
        };
        assert!(matches!(
            net.broadcast_target(),
            Err(ConfigError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_load_config_missing_file_returns_default() {
        let path = std::env::temp_dir().join("bj-server-config-does-not-exist.toml");
        let cfg = load_config(Some(&path)).expect("load");
        assert_eq!(cfg, ServerConfig::default());
    }

    #[test]
    fn test_load_config_reads_explicit_path() {
        // Arrange
        let path = std::env::temp_dir().join(format!("bj-server-{}.toml", std::process::id()));
        std::fs::write(&path, "[network]\ndiscovery_port = 20000\n").expect("write");

        // Act
        let cfg = load_config(Some(&path));
        let _ = std::fs::remove_file(&path);

        // Assert
        assert_eq!(cfg.expect("load").network.discovery_port, 20000);
    }

    #[test]
    fn test_load_config_rejects_malformed_toml() {
        let path = std::env::temp_dir().join(format!("bj-server-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[network\n").expect("write");

        let result = load_config(Some(&path));
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
