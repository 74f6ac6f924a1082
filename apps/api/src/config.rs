use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_MAIL_FROM: &str = "hr@company.com";
const DEFAULT_SCORING_ATTEMPT_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// When absent the service runs against the in-process store.
    pub database_url: Option<String>,
    pub anthropic_api_key: String,
    /// When absent every outbound email is a soft failure.
    pub sendgrid_api_key: Option<String>,
    pub mail_from: String,
    pub scoring_attempt_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = match optional_env("SCORING_ATTEMPT_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("SCORING_ATTEMPT_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_SCORING_ATTEMPT_TIMEOUT_SECS,
        };

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            sendgrid_api_key: optional_env("SENDGRID_API_KEY"),
            mail_from: optional_env("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
            scoring_attempt_timeout: Duration::from_secs(timeout_secs),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats unset and blank variables the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
