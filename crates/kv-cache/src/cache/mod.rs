//! # Cache Module
//!
//! Cache client and the backends it can run on.

pub mod backend;
pub mod client;
pub mod memory_backend;
pub mod redis_backend;

pub use backend::CacheBackend;
pub use client::{CacheClient, SharedCacheClient, shared_cache};
pub use memory_backend::MemoryBackend;
pub use redis_backend::RedisBackend;
