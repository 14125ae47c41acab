//! # Cache Backend Trait
//!
//! Abstract key-value interface the [`CacheClient`](super::CacheClient)
//! forwards to. Implementations can be swapped for different backends
//! (Redis, in-memory fake, etc.)

use async_trait::async_trait;

use crate::error::Result;

/// Key-value operations supported by a cache service
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Whether the connection to the service is currently established
    fn is_connected(&self) -> bool;

    /// Get the value stored under `key`, `None` if absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, expiring after `ttl_secs` seconds
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;

    /// Remove `key`, returning whether it existed
    async fn del(&self, key: &str) -> Result<bool>;

    /// Check if `key` exists
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Round-trip to the service
    async fn ping(&self) -> Result<()>;
}
