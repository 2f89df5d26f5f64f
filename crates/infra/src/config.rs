//! Process configuration, read from the environment (and `.env` if present).

use std::net::{Ipv4Addr, SocketAddr};

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set (or provide DATABASE_URL)")]
    Missing(&'static str),

    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings for the API process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
}

impl Settings {
    /// Load `.env` (when present) and read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("ignoring unreadable .env file: {e}");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    ///
    /// `DATABASE_URL` wins when set; otherwise a MySQL URL is assembled from
    /// `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD` and `DB_NAME`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, "APP_PORT", DEFAULT_PORT)?;
        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;

        let database_url = match lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => url,
            None => {
                let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string());
                let db_port: u16 = parse_or(&lookup, "DB_PORT", 3306)?;
                let user = lookup("DB_USER").unwrap_or_else(|| "root".to_string());
                let password = lookup("DB_PASSWORD").unwrap_or_default();
                let name = lookup("DB_NAME").ok_or(ConfigError::Missing("DB_NAME"))?;
                format!("mysql://{user}:{password}@{host}:{db_port}/{name}")
            }
        };

        Ok(Self {
            port,
            database_url,
            max_connections,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
