//! Client configuration.
//!
//! Native builds read the process environment at startup; `wasm32` builds have
//! no environment, so the same keys are baked in at compile time.

use astexo_auth::Environment;
use thiserror::Error;

pub const API_URL_VAR: &str = "ASTEXO_API_URL";
pub const ENV_VAR: &str = "ASTEXO_ENV";
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the credential-exchange backend (no trailing slash).
    pub api_base_url: String,
    /// Controls the `Secure` attribute on the `account_type` cookie.
    pub environment: Environment,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            environment: Environment::Development,
        }
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>, environment: Environment) -> Result<Self, ConfigError> {
        let api_base_url = normalize_base_url(api_base_url.into())?;
        Ok(Self {
            api_base_url,
            environment,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(lookup)
    }

    /// Build from an arbitrary key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let api_base_url = lookup(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let environment = match lookup(ENV_VAR) {
            Some(raw) => raw.parse().map_err(|message| ConfigError::Invalid {
                key: ENV_VAR,
                message,
            })?,
            None => Environment::Development,
        };

        Self::new(api_base_url, environment)
    }
}

fn normalize_base_url(raw: String) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/').to_string();
    reqwest::Url::parse(&trimmed).map_err(|e| ConfigError::Invalid {
        key: API_URL_VAR,
        message: format!("'{trimmed}' is not a valid URL ({e})"),
    })?;
    Ok(trimmed)
}

#[cfg(not(target_arch = "wasm32"))]
fn lookup(key: &'static str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(target_arch = "wasm32")]
fn lookup(key: &'static str) -> Option<String> {
    let value = match key {
        API_URL_VAR => option_env!("ASTEXO_API_URL"),
        ENV_VAR => option_env!("ASTEXO_ENV"),
        _ => None,
    };
    value.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_map(pairs: &[(&'static str, &str)]) -> Result<ClientConfig, ConfigError> {
        let map: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
        ClientConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(from_map(&[]).unwrap(), ClientConfig::default());
    }

    #[test]
    fn trims_trailing_slash_and_reads_environment() {
        let cfg = from_map(&[
            (API_URL_VAR, "https://api.astexo.com/v1/"),
            (ENV_VAR, "production"),
        ])
        .unwrap();

        assert_eq!(cfg.api_base_url, "https://api.astexo.com/v1");
        assert_eq!(cfg.environment, Environment::Production);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            from_map(&[(API_URL_VAR, "not a url")]),
            Err(ConfigError::Invalid { key: API_URL_VAR, .. })
        ));
        assert!(matches!(
            from_map(&[(ENV_VAR, "staging")]),
            Err(ConfigError::Invalid { key: ENV_VAR, .. })
        ));
    }
}
