//! services/companion/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use reqwest::Url;
use tracing::Level;

pub const DEFAULT_BACKEND_BASE_URL: &str = "http://localhost:8001";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the AI backend, without a trailing slash.
    pub backend_base_url: String,
    pub log_level: Level,
    /// Treat a failed setup call as a completed profile anyway.
    pub mask_setup_failures: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_base_url: DEFAULT_BACKEND_BASE_URL.to_string(),
            log_level: Level::INFO,
            mask_setup_failures: true,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_base_url = parse_base_url(
            &lookup("BACKEND_BASE_URL").unwrap_or_else(|| DEFAULT_BACKEND_BASE_URL.to_string()),
        )?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let mask_setup_failures = match lookup("MASK_SETUP_FAILURES") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "MASK_SETUP_FAILURES".to_string(),
                    format!("'{}' is not a boolean", raw),
                )
            })?,
            None => true,
        };

        Ok(Self {
            backend_base_url,
            log_level,
            mask_setup_failures,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidValue("BACKEND_BASE_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue(
            "BACKEND_BASE_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.backend_base_url, DEFAULT_BACKEND_BASE_URL);
        assert_eq!(config.log_level, Level::INFO);
        assert!(config.mask_setup_failures);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config =
            Config::from_lookup(lookup_from(&[("BACKEND_BASE_URL", "https://tutor.example/")]))
                .unwrap();
        assert_eq!(config.backend_base_url, "https://tutor.example");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("BACKEND_BASE_URL", "not a url")])),
            Err(ConfigError::InvalidValue(var, _)) if var == "BACKEND_BASE_URL"
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("BACKEND_BASE_URL", "ftp://files.example")])),
            Err(ConfigError::InvalidValue(_, _))
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("RUST_LOG", "loud")])),
            Err(ConfigError::InvalidValue(var, _)) if var == "RUST_LOG"
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("MASK_SETUP_FAILURES", "maybe")])),
            Err(ConfigError::InvalidValue(var, _)) if var == "MASK_SETUP_FAILURES"
        ));
    }

    #[test]
    fn masking_can_be_disabled() {
        let config =
            Config::from_lookup(lookup_from(&[("MASK_SETUP_FAILURES", "false"), ("RUST_LOG", "debug")]))
                .unwrap();
        assert!(!config.mask_setup_failures);
        assert_eq!(config.log_level, Level::DEBUG);
    }
}
