//! Cache layer error types

use thiserror::Error;

/// Cache layer errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Cache connection is not established")]
    NotConnected,

    #[error("Invalid cache configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Connection attempt timed out after {timeout_ms}ms")]
    ConnectTimeout { timeout_ms: u64 },
}

impl CacheError {
    /// Whether this error means the cache service could not be reached,
    /// as opposed to a failure of a single command.
    pub const fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::NotConnected | Self::ConnectTimeout { .. }
        )
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if is_connection_failure(&err) {
            Self::Connection(err.to_string())
        } else {
            Self::Redis(err.to_string())
        }
    }
}

/// Whether a Redis error means the server was unreachable or went away
/// rather than rejecting a command.
fn is_connection_failure(err: &redis::RedisError) -> bool {
    err.is_io_error()
        || err.is_connection_dropped()
        || err.is_connection_refusal()
        || err.is_timeout()
}

pub type Result<T> = std::result::Result<T, CacheError>;
