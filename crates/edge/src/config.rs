//! Process configuration, read once at startup.

use std::net::SocketAddr;

use astexo_auth::Environment;
use astexo_observability::LogFormat;
use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "ASTEXO_BIND_ADDR";
pub const ENV_VAR: &str = "ASTEXO_ENV";
pub const LOG_FORMAT_VAR: &str = "ASTEXO_LOG_FORMAT";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeConfig {
    pub bind_addr: SocketAddr,
    /// Controls the `Secure` attribute on cookies the server action sets.
    pub environment: Environment,
    pub log_format: LogFormat,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            environment: Environment::Development,
            log_format: LogFormat::Json,
        }
    }
}

impl EdgeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let bind_addr = lookup(BIND_ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse()
            .map_err(|e| ConfigError::Invalid {
                key: BIND_ADDR_VAR,
                message: format!("{e}"),
            })?;

        let environment = match lookup(ENV_VAR) {
            Some(raw) => raw.parse().map_err(|message| ConfigError::Invalid {
                key: ENV_VAR,
                message,
            })?,
            None => Environment::Development,
        };

        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse().map_err(|e: astexo_observability::UnknownLogFormat| {
                ConfigError::Invalid {
                    key: LOG_FORMAT_VAR,
                    message: e.to_string(),
                }
            })?,
            None => LogFormat::Json,
        };

        Ok(Self {
            bind_addr,
            environment,
            log_format,
        })
    }
}
