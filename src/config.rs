//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `COMMERCE_BACKEND` - `scylla` or `memory` (default: scylla)
//! - `COMMERCE_SCYLLA_NODES` - comma separated `host:port` list (default: 127.0.0.1:9042)
//! - `COMMERCE_SCYLLA_KEYSPACE` - keyspace name (default: commerce)
//! - `COMMERCE_CONNECT_ATTEMPTS` - connection attempts at startup (default: 10)
//! - `COMMERCE_HTTP_HOST` - API bind address (default: 0.0.0.0)
//! - `COMMERCE_HTTP_PORT` - API port (default: 8080)
//! - `COMMERCE_METRICS_PORT` - Prometheus port (default: 9090)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Scylla,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "scylla" | "scylladb" => Ok(Backend::Scylla),
            other => Err(format!("unknown backend '{other}' (expected 'memory' or 'scylla')")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScyllaConfig {
    pub nodes: Vec<String>,
    pub keyspace: String,
    pub connect_attempts: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: Backend,
    pub scylla: ScyllaConfig,
    /// IP address the API binds to
    pub host: IpAddr,
    pub port: u16,
    pub metrics_port: u16,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup; unset keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let backend = parse_var("COMMERCE_BACKEND", &get("COMMERCE_BACKEND", "scylla"))?;

        let nodes: Vec<String> = get("COMMERCE_SCYLLA_NODES", "127.0.0.1:9042")
            .split(',')
            .map(str::trim)
            .filter(|node| !node.is_empty())
            .map(String::from)
            .collect();
        if nodes.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "COMMERCE_SCYLLA_NODES".to_string(),
                "at least one node is required".to_string(),
            ));
        }

        let keyspace = get("COMMERCE_SCYLLA_KEYSPACE", "commerce");
        if keyspace.is_empty() || !keyspace.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ConfigError::InvalidEnvVar(
                "COMMERCE_SCYLLA_KEYSPACE".to_string(),
                format!("'{keyspace}' is not a valid keyspace name"),
            ));
        }

        let connect_attempts =
            parse_var("COMMERCE_CONNECT_ATTEMPTS", &get("COMMERCE_CONNECT_ATTEMPTS", "10"))?;
        let host = parse_var("COMMERCE_HTTP_HOST", &get("COMMERCE_HTTP_HOST", "0.0.0.0"))?;
        let port = parse_var("COMMERCE_HTTP_PORT", &get("COMMERCE_HTTP_PORT", "8080"))?;
        let metrics_port =
            parse_var("COMMERCE_METRICS_PORT", &get("COMMERCE_METRICS_PORT", "9090"))?;

        Ok(Self {
            backend,
            scylla: ScyllaConfig {
                nodes,
                keyspace,
                connect_attempts,
            },
            host,
            port,
            metrics_port,
        })
    }

    /// Returns the socket address for binding the API server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
