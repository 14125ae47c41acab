//! # Cache Client
//!
//! String key-value client with expiration. The plain operations
//! (`get`/`set`/`del`) log failures and never return them; the `try_*`
//! variants hand the error back so callers can tell a missing key from an
//! unreachable cache.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use super::backend::CacheBackend;
use super::redis_backend::RedisBackend;
use crate::config::CacheConfig;
use crate::error::Result;

/// Cache client owning a single backend connection
pub struct CacheClient<B: CacheBackend = RedisBackend> {
    backend: B,
}

impl CacheClient<RedisBackend> {
    /// Connect to Redis.
    ///
    /// An unreachable server is logged and yields a client whose
    /// [`is_alive`](Self::is_alive) is false.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Config`](crate::CacheError::Config) if the URL
    /// cannot be parsed.
    pub async fn connect(config: CacheConfig) -> Result<Self> {
        let backend = RedisBackend::connect(&config).await?;
        Ok(Self::with_backend(backend))
    }

    /// Connect using [`CacheConfig::from_env`]
    ///
    /// # Errors
    ///
    /// See [`connect`](Self::connect).
    pub async fn connect_from_env() -> Result<Self> {
        Self::connect(CacheConfig::from_env()).await
    }
}

impl<B: CacheBackend> CacheClient<B> {
    /// Wrap an already constructed backend
    pub const fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Borrow the underlying backend
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether the connection is currently established
    pub fn is_alive(&self) -> bool {
        self.backend.is_connected()
    }

    // =========================================================================
    // LOGGED OPERATIONS
    // =========================================================================

    /// Get the value for `key`.
    ///
    /// Returns `None` when the key is absent and also when the lookup fails;
    /// failures are logged.
    pub async fn get(&self, key: &str) -> Option<String> {
        match self.try_get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(key, error = %e, "Error retrieving key \"{key}\": {e}");
                None
            }
        }
    }

    /// Store `value` under `key` for `duration_secs` seconds. Failures are
    /// logged.
    pub async fn set(&self, key: &str, value: &str, duration_secs: u64) {
        if let Err(e) = self.try_set(key, value, duration_secs).await {
            tracing::error!(
                key,
                value,
                duration_secs,
                error = %e,
                "Error setting key \"{key}\" with value \"{value}\": {e}"
            );
        }
    }

    /// Delete `key`. A missing key is not an error; failures are logged.
    pub async fn del(&self, key: &str) {
        if let Err(e) = self.try_del(key).await {
            tracing::error!(key, error = %e, "Error deleting key \"{key}\": {e}");
        }
    }

    /// Check if `key` exists, `false` on failure
    pub async fn exists(&self, key: &str) -> bool {
        match self.backend.exists(key).await {
            Ok(found) => found,
            Err(e) => {
                tracing::error!(key, error = %e, "Error checking key \"{key}\": {e}");
                false
            }
        }
    }

    /// Actively probe the service, `false` if it does not answer
    pub async fn ping(&self) -> bool {
        match self.backend.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Cache ping failed");
                false
            }
        }
    }

    // =========================================================================
    // STRICT OPERATIONS
    // =========================================================================

    /// Get the value for `key`; `Ok(None)` means the key is absent.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the lookup could not be performed.
    pub async fn try_get(&self, key: &str) -> Result<Option<String>> {
        let value = self.backend.get(key).await?;

        match &value {
            Some(_) => tracing::debug!(key, "Cache hit"),
            None => tracing::debug!(key, "Cache miss"),
        }

        Ok(value)
    }

    /// Store `value` under `key` for `duration_secs` seconds.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the write was not acknowledged.
    pub async fn try_set(&self, key: &str, value: &str, duration_secs: u64) -> Result<()> {
        self.backend.set_ex(key, value, duration_secs).await?;
        tracing::debug!(key, duration_secs, "Cached key");
        Ok(())
    }

    /// Delete `key`, returning whether it existed.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the delete was not acknowledged.
    pub async fn try_del(&self, key: &str) -> Result<bool> {
        let deleted = self.backend.del(key).await?;
        tracing::debug!(key, deleted, "Deleted key");
        Ok(deleted)
    }

    // =========================================================================
    // JSON OPERATIONS
    // =========================================================================

    /// Get a JSON value from cache. Undecodable values are logged and
    /// treated as absent.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = self.get(key).await?;

        match serde_json::from_str(&json) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::error!(key, error = %e, "Error decoding key \"{key}\": {e}");
                None
            }
        }
    }

    /// Set a JSON value in cache with an expiration
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, duration_secs: u64) {
        match serde_json::to_string(value) {
            Ok(json) => self.set(key, &json, duration_secs).await,
            Err(e) => {
                tracing::error!(key, error = %e, "Error encoding value for key \"{key}\": {e}");
            }
        }
    }
}

/// Shared cache client wrapper
pub type SharedCacheClient<B = RedisBackend> = Arc<CacheClient<B>>;

/// Create a shared cache client
pub fn shared_cache<B: CacheBackend>(client: CacheClient<B>) -> SharedCacheClient<B> {
    Arc::new(client)
}
