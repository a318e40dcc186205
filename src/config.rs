//! Runtime configuration.
//!
//! All configuration comes from environment variables at startup. The two
//! required values are the completion-service credential and the downstream
//! record-fetch address; if either is missing the process refuses to start
//! rather than running with a broken pipeline.

use thiserror::Error;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind the HTTP server to.
    pub host: String,
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// API key for the completion service.
    pub openai_api_key: String,
    /// Model used for goal decomposition.
    pub openai_model: String,
    /// Power Automate flow URL that returns Salesforce records.
    pub power_automate_url: String,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// Required: `OPENAI_API_KEY`, `POWER_AUTOMATE_URL`.
    /// Optional: `OPENAI_MODEL` (default `gpt-4`), `HOST` (default
    /// `0.0.0.0`), `PORT` (default `5000`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let openai_api_key =
            required_var("OPENAI_API_KEY").ok_or(ConfigError::MissingVar("OPENAI_API_KEY"))?;
        let power_automate_url = required_var("POWER_AUTOMATE_URL")
            .ok_or(ConfigError::MissingVar("POWER_AUTOMATE_URL"))?;

        let openai_model =
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4".to_string());
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value: raw,
            })?,
            Err(_) => 5000,
        };

        Ok(Self {
            host,
            port,
            openai_api_key,
            openai_model,
            power_automate_url,
        })
    }
}

/// Read a required variable, treating empty strings as absent.
fn required_var(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}
