use crate::types::{GameLimits, DEFAULT_MAX_PLAYERS, DEFAULT_MIN_PLAYERS};
use std::net::SocketAddr;

pub const DEFAULT_BIND: &str = "127.0.0.1:6574";

/// Server settings read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address the presentation server listens on. Loopback by default:
    /// the game runs on one device.
    pub bind: SocketAddr,
    /// Fixed seed for role shuffles and word picks
    pub seed: Option<u64>,
    /// Directory with the presentation assets
    pub static_dir: String,
    pub limits: GameLimits,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 6574)),
            seed: None,
            static_dir: "static".to_string(),
            limits: GameLimits::default(),
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env_value(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

impl ServerConfig {
    /// Load config from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let limits = GameLimits::new(
            parsed_env("MIN_PLAYERS").unwrap_or(DEFAULT_MIN_PLAYERS),
            parsed_env("MAX_PLAYERS").unwrap_or(DEFAULT_MAX_PLAYERS),
        );

        Self {
            bind: parsed_env("IMPOSTOR_BIND").unwrap_or(defaults.bind),
            seed: parsed_env("IMPOSTOR_SEED"),
            static_dir: env_value("STATIC_DIR").unwrap_or(defaults.static_dir),
            limits,
        }
    }
}
