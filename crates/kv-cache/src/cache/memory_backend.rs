//! # In-Memory Backend
//!
//! Process-local [`CacheBackend`] with TTL expiry, used in place of a live
//! Redis server. Expiry follows the tokio clock so paused-time tests can
//! advance past a TTL.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::backend::CacheBackend;
use crate::error::{CacheError, Result};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// In-memory cache storage
#[derive(Debug)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, Entry>>,
    connected: AtomicBool,
}

impl MemoryBackend {
    /// Create an empty, connected backend
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            connected: AtomicBool::new(true),
        }
    }

    /// Simulate the service going away (`false`) or coming back (`true`).
    ///
    /// While disconnected every operation fails with
    /// [`CacheError::NotConnected`]; stored entries are kept.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.is_live(now))
            .count()
    }

    /// Whether no live entries remain
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(CacheError::NotConnected)
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.ensure_connected()?;
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(e) if e.is_live(now) => return Ok(Some(e.value.clone())),
                None => return Ok(None),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| !e.is_live(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        self.ensure_connected()?;
        if ttl_secs == 0 {
            // Same rejection a Redis server gives for `SET k v EX 0`.
            return Err(CacheError::Redis(
                "invalid expire time in 'set' command".to_string(),
            ));
        }

        let now = Instant::now();
        let entry = Entry {
            value: value.to_string(),
            expires_at: now + Duration::from_secs(ttl_secs),
        };

        let mut entries = self.entries.write().await;
        entries.retain(|_, e| e.is_live(now));
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<bool> {
        self.ensure_connected()?;
        let now = Instant::now();
        let removed = self.entries.write().await.remove(key);
        Ok(removed.is_some_and(|e| e.is_live(now)))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn ping(&self) -> Result<()> {
        self.ensure_connected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let backend = MemoryBackend::new();
        backend.set_ex("a", "1", 30).await.unwrap();

        assert_eq!(backend.get("a").await.unwrap(), Some("1".to_string()));
        assert!(backend.exists("a").await.unwrap());
        assert_eq!(backend.len().await, 1);
    }

    #[tokio::test]
    async fn test_del_reports_existence() {
        let backend = MemoryBackend::new();
        backend.set_ex("a", "1", 30).await.unwrap();

        assert!(backend.del("a").await.unwrap());
        assert!(!backend.del("a").await.unwrap());
        assert!(backend.is_empty().await);
    }

    #[tokio::test]
    async fn test_zero_ttl_rejected() {
        let backend = MemoryBackend::new();
        let err = backend.set_ex("a", "1", 0).await.unwrap_err();

        assert!(err.to_string().contains("invalid expire time"));
        assert_eq!(backend.get("a").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires() {
        let backend = MemoryBackend::new();
        backend.set_ex("a", "1", 5).await.unwrap();

        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(backend.get("a").await.unwrap(), Some("1".to_string()));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(backend.get("a").await.unwrap(), None);
        assert!(!backend.del("a").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entries_are_dropped() {
        let backend = MemoryBackend::new();
        backend.set_ex("short", "1", 1).await.unwrap();
        backend.set_ex("other", "2", 1).await.unwrap();
        backend.set_ex("long", "3", 60).await.unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(backend.get("short").await.unwrap(), None);
        assert!(!backend.entries.read().await.contains_key("short"));
        assert_eq!(backend.entries.read().await.len(), 2);

        backend.set_ex("fresh", "4", 60).await.unwrap();
        let entries = backend.entries.read().await;
        assert!(!entries.contains_key("other"));
        assert!(entries.contains_key("long"));
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn test_outage_fails_every_operation() {
        let backend = MemoryBackend::new();
        backend.set_ex("a", "1", 30).await.unwrap();
        backend.set_connected(false);

        assert!(!backend.is_connected());
        assert!(matches!(backend.get("a").await, Err(CacheError::NotConnected)));
        assert!(matches!(backend.set_ex("b", "2", 30).await, Err(CacheError::NotConnected)));
        assert!(matches!(backend.del("a").await, Err(CacheError::NotConnected)));
        assert!(matches!(backend.ping().await, Err(CacheError::NotConnected)));

        backend.set_connected(true);
        assert_eq!(backend.get("a").await.unwrap(), Some("1".to_string()));
    }
}
