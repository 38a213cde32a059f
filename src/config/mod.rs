//! Configuration module for the Volunteer Hub backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// SQLite file backing local storage; `None` keeps storage in memory
    pub storage_path: Option<PathBuf>,
    /// Simulated round trip for login/register
    pub auth_latency: Duration,
    /// Period of the synthetic chat broadcast
    pub chat_broadcast_interval: Duration,
    /// Delay before a sent chat message is echoed back
    pub chat_echo_delay: Duration,
    /// Load the demo events on startup
    pub seed_events: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let bind_addr = env::var("VHUB_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid VHUB_BIND_ADDR format");

        let log_level = env::var("VHUB_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let storage_path = match env::var("VHUB_STORAGE_PATH") {
            Ok(path) if path.eq_ignore_ascii_case("memory") => None,
            Ok(path) => Some(path.into()),
            Err(_) => Some("./data/local_storage.sqlite".into()),
        };

        let auth_latency = Duration::from_millis(parse_or("VHUB_AUTH_LATENCY_MS", 1000));
        let chat_broadcast_interval = Duration::from_secs(parse_or("VHUB_CHAT_INTERVAL_SECS", 15));
        let chat_echo_delay = Duration::from_millis(parse_or("VHUB_CHAT_ECHO_MS", 500));

        let seed_events = env::var("VHUB_SEED_EVENTS")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);

        Self {
            bind_addr,
            log_level,
            storage_path,
            auth_latency,
            chat_broadcast_interval,
            chat_echo_delay,
            seed_events,
        }
    }
}

/// Read a numeric variable, falling back to `default` when unset or unparseable.
fn parse_or(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
