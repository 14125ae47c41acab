//! # Redis Backend
//!
//! [`CacheBackend`] over a single multiplexed Redis connection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, ErrorKind, RedisResult};
use tokio::sync::OnceCell;

use super::backend::CacheBackend;
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

/// Redis-backed cache storage
///
/// Holds at most one [`ConnectionManager`]. It is opened in
/// [`RedisBackend::connect`], or by the first operation after a failed
/// startup attempt, and never replaced once established. Clones of the
/// manager share the same connection.
pub struct RedisBackend {
    client: Client,
    conn: OnceCell<ConnectionManager>,
    connected: AtomicBool,
    connect_timeout: Duration,
}

impl RedisBackend {
    /// Open the connection described by `config`.
    ///
    /// A server that cannot be reached is logged and leaves the backend in
    /// the not-connected state rather than failing; later operations try
    /// again. Only a malformed URL is returned as an error.
    pub async fn connect(config: &CacheConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str()).map_err(|e| match e.kind() {
            ErrorKind::InvalidClientConfig => CacheError::Config(e.to_string()),
            _ => CacheError::from(e),
        })?;

        let backend = Self {
            client,
            conn: OnceCell::new(),
            connected: AtomicBool::new(false),
            connect_timeout: config.connect_timeout,
        };

        match backend.handle().await {
            Ok(_) => tracing::debug!(url = %config.url, "Redis connection established"),
            Err(_) => tracing::warn!(url = %config.url, "Starting without a Redis connection"),
        }

        Ok(backend)
    }

    /// The shared connection, opening it on first use.
    async fn handle(&self) -> Result<ConnectionManager> {
        let conn = self.conn.get_or_try_init(|| self.open()).await?;
        Ok(conn.clone())
    }

    async fn open(&self) -> Result<ConnectionManager> {
        match tokio::time::timeout(self.connect_timeout, ConnectionManager::new(self.client.clone()))
            .await
        {
            Ok(result) => self.observe(result),
            Err(_) => {
                let err = CacheError::ConnectTimeout {
                    timeout_ms: u64::try_from(self.connect_timeout.as_millis())
                        .unwrap_or(u64::MAX),
                };
                Err(self.report(err))
            }
        }
    }

    /// Error observer: every reply passes through here so the liveness flag
    /// tracks the last round-trip, and connection-level failures get logged.
    fn observe<T>(&self, result: RedisResult<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.connected.store(true, Ordering::Relaxed);
                Ok(value)
            }
            Err(e) => {
                let err = CacheError::from(e);
                if err.is_connection_error() {
                    Err(self.report(err))
                } else {
                    Err(err)
                }
            }
        }
    }

    fn report(&self, err: CacheError) -> CacheError {
        self.connected.store(false, Ordering::Relaxed);
        tracing::error!(error = %err, "Redis client error: {err}");
        err
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    fn is_connected(&self) -> bool {
        self.conn.initialized() && self.connected.load(Ordering::Relaxed)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.handle().await?;
        self.observe(conn.get(key).await)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let mut conn = self.handle().await?;
        self.observe(conn.set_ex::<_, _, ()>(key, value, ttl_secs).await)
    }

    async fn del(&self, key: &str) -> Result<bool> {
        let mut conn = self.handle().await?;
        let deleted: i64 = self.observe(conn.del(key).await)?;
        Ok(deleted > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.handle().await?;
        self.observe(conn.exists(key).await)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.handle().await?;
        let _: String = self.observe(redis::cmd("PING").query_async(&mut conn).await)?;
        Ok(())
    }
}
