//! Configuration management for the booking client.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Unparseable values fall back to the default.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which data provider backs the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Seats and balances kept in process memory
    #[default]
    Memory,
    /// Remote backend over HTTP
    Http,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mock" => Ok(Self::Memory),
            "http" | "api" => Ok(Self::Http),
            other => Err(format!("unknown provider '{other}' (expected memory or http)")),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data provider configuration
    pub provider: ProviderConfig,
    /// Session configuration
    pub session: SessionConfig,
}

/// Data provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider kind: memory or http (default: memory)
    pub kind: ProviderKind,
    /// Base URL of the booking backend
    pub api_url: String,
    /// Bearer token sent to the backend
    pub api_token: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout: u64,
    /// Delay in-memory calls like a remote backend would
    pub simulate_latency: bool,
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Log filter (trace, debug, info, warn, error or an `EnvFilter` directive)
    pub log_level: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            provider: ProviderConfig {
                kind: lookup("BLU_RESERVE_PROVIDER")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_default(),
                api_url: lookup("BLU_RESERVE_API_URL")
                    .unwrap_or_else(|| "http://localhost:8000".to_string()),
                api_token: lookup("BLU_RESERVE_API_TOKEN").filter(|token| !token.is_empty()),
                request_timeout: lookup("BLU_RESERVE_REQUEST_TIMEOUT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
                simulate_latency: lookup("BLU_RESERVE_SIMULATE_LATENCY")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(true),
            },
            session: SessionConfig {
                log_level: lookup("RUST_LOG")
                    .unwrap_or_else(|| "info,blu_reserve=debug".to_string()),
                shutdown_timeout: lookup("BLU_RESERVE_SHUTDOWN_TIMEOUT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            },
        }
    }
}

impl ProviderConfig {
    /// Request timeout as a `Duration`
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl SessionConfig {
    /// Shutdown timeout as a `Duration`
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]);
        assert_eq!(config.provider.kind, ProviderKind::Memory);
        assert_eq!(config.provider.api_url, "http://localhost:8000");
        assert!(config.provider.api_token.is_none());
        assert_eq!(config.provider.request_timeout(), Duration::from_secs(10));
        assert!(config.provider.simulate_latency);
        assert_eq!(config.session.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(config.session.log_level, "info,blu_reserve=debug");
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("BLU_RESERVE_PROVIDER", "HTTP"),
            ("BLU_RESERVE_API_URL", "https://desks.example.com"),
            ("BLU_RESERVE_API_TOKEN", "abc"),
            ("BLU_RESERVE_REQUEST_TIMEOUT", "3"),
            ("BLU_RESERVE_SIMULATE_LATENCY", "false"),
            ("BLU_RESERVE_SHUTDOWN_TIMEOUT", "1"),
        ]);
        assert_eq!(config.provider.kind, ProviderKind::Http);
        assert_eq!(config.provider.api_url, "https://desks.example.com");
        assert_eq!(config.provider.api_token.as_deref(), Some("abc"));
        assert_eq!(config.provider.request_timeout, 3);
        assert!(!config.provider.simulate_latency);
        assert_eq!(config.session.shutdown_timeout, 1);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config_from(&[
            ("BLU_RESERVE_PROVIDER", "carrier-pigeon"),
            ("BLU_RESERVE_REQUEST_TIMEOUT", "soon"),
            ("BLU_RESERVE_API_TOKEN", ""),
        ]);
        assert_eq!(config.provider.kind, ProviderKind::Memory);
        assert_eq!(config.provider.request_timeout, 10);
        assert!(config.provider.api_token.is_none());
    }

    #[test]
    fn provider_kind_parsing() {
        assert_eq!("memory".parse::<ProviderKind>(), Ok(ProviderKind::Memory));
        assert_eq!(" Http ".parse::<ProviderKind>(), Ok(ProviderKind::Http));
        assert!("ftp".parse::<ProviderKind>().is_err());
        assert_eq!(ProviderKind::Http.to_string(), "http");
    }
}
