//! Configuration loading and representation.
//!
//! Values come from process environment variables. Loading a `.env` file into
//! the environment is the binary's job; this module only reads variables.

use std::net::SocketAddr;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown storage backend '{0}' (expected 'memory' or 'postgres')")]
    UnknownBackend(String),

    #[error("DATABASE_URL (or DB_CONNECTION_STRING) must be set for the postgres backend")]
    MissingDatabaseUrl,

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Which repository backend the process runs with. Fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    InMemory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

impl StorageConfig {
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::InMemory => "memory",
            Self::Postgres { .. } => "postgres",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// - `STORAGE_BACKEND`: `memory` | `postgres`; defaults to `postgres` when a
    ///   database URL is present, `memory` otherwise
    /// - `DATABASE_URL`, falling back to `DB_CONNECTION_STRING`
    /// - `DB_MAX_CONNECTIONS` (default 5)
    /// - `BIND_ADDR` (default `0.0.0.0:8080`)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = non_empty("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let database_url = non_empty("DATABASE_URL").or_else(|| non_empty("DB_CONNECTION_STRING"));

        let backend = match non_empty("STORAGE_BACKEND") {
            Some(v) => v.trim().to_lowercase(),
            None if database_url.is_some() => "postgres".to_string(),
            None => "memory".to_string(),
        };

        let storage = match backend.as_str() {
            "memory" | "in-memory" | "in_memory" => StorageConfig::InMemory,
            "postgres" | "postgresql" => {
                let database_url = database_url.ok_or(ConfigError::MissingDatabaseUrl)?;
                let max_connections = match non_empty("DB_MAX_CONNECTIONS") {
                    Some(v) => parse_max_connections(&v)?,
                    None => DEFAULT_MAX_CONNECTIONS,
                };
                StorageConfig::Postgres {
                    database_url,
                    max_connections,
                }
            }
            _ => return Err(ConfigError::UnknownBackend(backend)),
        };

        Ok(Self { bind_addr, storage })
    }
}

fn parse_max_connections(raw: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var: "DB_MAX_CONNECTIONS",
        reason,
    };

    match raw.trim().parse::<u32>() {
        Ok(0) => Err(invalid("must be at least 1".to_string())),
        Ok(n) => Ok(n),
        Err(e) => Err(invalid(e.to_string())),
    }
}
