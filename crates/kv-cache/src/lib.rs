//! # KV Cache Library
//!
//! Thin async client for a Redis key-value cache: liveness check, get,
//! set-with-expiration and delete.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Application Layer                        │
//! │              (holds a SharedCacheClient)                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       CacheClient                            │
//! │   get / set / del (logged)    try_get / try_set / try_del   │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                   │
//!                    ▼                   ▼
//! ┌─────────────────────────┐   ┌──────────────────────────────┐
//! │     RedisBackend        │   │        MemoryBackend         │
//! │  (ConnectionManager)    │   │   (in-process, for tests)    │
//! └─────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kv_cache::{shared_cache, CacheClient, CacheConfig};
//!
//! kv_cache::telemetry::init_tracing("info");
//!
//! let cache = shared_cache(CacheClient::connect(CacheConfig::from_env()).await?);
//!
//! cache.set("session:42", "userA", 60).await;
//! let user = cache.get("session:42").await;
//! cache.del("session:42").await;
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types
pub use cache::{
    CacheBackend, CacheClient, MemoryBackend, RedisBackend, SharedCacheClient, shared_cache,
};
pub use config::CacheConfig;
pub use error::{CacheError, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Connect a shared client using configuration from the environment
///
/// # Errors
///
/// Returns an error if the configured Redis URL is malformed.
pub async fn init_default() -> Result<SharedCacheClient> {
    let client = CacheClient::connect_from_env().await?;
    Ok(shared_cache(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
