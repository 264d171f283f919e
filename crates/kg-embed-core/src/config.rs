//! Environment variable helpers used by the service binaries.
//!
//! Empty or whitespace-only values are treated the same as unset ones.

use std::str::FromStr;

use crate::error::ConfigError;

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Fetches a required, non-empty environment variable.
pub fn must_env(name: &'static str) -> Result<String, ConfigError> {
    non_empty(name).ok_or(ConfigError::MissingVar(name))
}

/// Fetches an environment variable, falling back to `default`.
pub fn env_or(name: &str, default: &str) -> String {
    non_empty(name).unwrap_or_else(|| default.to_string())
}

/// Fetches an optional environment variable.
pub fn env_opt(name: &str) -> Option<String> {
    non_empty(name)
}

/// Parses an environment variable, falling back to `default` when unset.
///
/// A set but unparsable value is an error rather than a silent fallback.
pub fn env_parse_or<T: FromStr>(
    name: &'static str,
    default: T,
    reason: &'static str,
) -> Result<T, ConfigError> {
    match non_empty(name) {
        Some(v) => v
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { var: name, reason }),
        None => Ok(default),
    }
}
