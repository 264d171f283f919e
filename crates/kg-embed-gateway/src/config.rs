use std::time::Duration;

use kg_embed_core::config::{env_or, env_parse_or, must_env};
use kg_embed_core::error::ConfigError;
use kg_embed_openai::client::API_KEY_VAR;

pub const DEFAULT_PORT: u16 = 8001;
pub const DEFAULT_RATE_LIMIT: u32 = 3;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Gateway settings read from the environment at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_key: String,
    pub port: u16,
    pub rate_limit: u32,
    pub base_url: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Fails when the API key is missing or any numeric variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = must_env(API_KEY_VAR)?;
        let port = env_parse_or("ADA002_PORT", DEFAULT_PORT, "expected a port number")?;
        let rate_limit = env_parse_or(
            "ADA002_RATE_LIMIT",
            DEFAULT_RATE_LIMIT,
            "expected a positive integer",
        )?;
        if rate_limit == 0 {
            return Err(ConfigError::InvalidNumber {
                var: "ADA002_RATE_LIMIT",
                reason: "expected a positive integer",
            });
        }
        let base_url = env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL);
        let timeout_secs = env_parse_or(
            "OPENAI_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
            "expected a number of seconds",
        )?;

        Ok(Self {
            api_key,
            port,
            rate_limit,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
