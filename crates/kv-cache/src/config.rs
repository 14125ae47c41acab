//! # Cache Configuration
//!
//! Environment-based configuration for the Redis connection.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

/// Default Redis URL used when none is configured
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default timeout for the initial connection attempt
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Redis connection configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Upper bound on the initial connection attempt
    pub connect_timeout: Duration,
}

impl CacheConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `REDIS_URL` and `REDIS_CONNECT_TIMEOUT_SECS`. Values from a
    /// `.env` file, if one exists, fill in variables the process does not
    /// set; the process environment itself is left untouched. Missing or
    /// unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let file = dotenvy::dotenv_iter()
            .map(collect_pairs)
            .unwrap_or_default();

        Self::from_layers(&file)
    }

    fn from_layers(file: &HashMap<String, String>) -> Self {
        Self::from_lookup(|name| env::var(name).ok().or_else(|| file.get(name).cloned()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            url: lookup("REDIS_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),

            connect_timeout: lookup("REDIS_CONNECT_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .map_or(DEFAULT_CONNECT_TIMEOUT, Duration::from_secs),
        }
    }

    /// Override the connection URL
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Override the connect timeout
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

fn collect_pairs<I>(iter: I) -> HashMap<String, String>
where
    I: Iterator<Item = dotenvy::Result<(String, String)>>,
{
    iter.filter_map(std::result::Result::ok).collect()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REDIS_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}
