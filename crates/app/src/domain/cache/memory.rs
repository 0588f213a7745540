//! In-process pass cache.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{
    cache::{CacheError, PassCache, cache_key},
    passes::records::PassRecord,
};

const DEFAULT_CAPACITY: usize = 10_000;

#[derive(Debug, Clone)]
struct CacheEntry {
    pass: PassRecord,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Pass cache held in process memory, for single-node deployments and tests.
///
/// Entries past their deadline are evicted lazily when read, or in bulk when
/// the cache reaches capacity.
#[derive(Debug)]
pub struct InMemoryPassCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    capacity: usize,
}

impl InMemoryPassCache {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for InMemoryPassCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PassCache for InMemoryPassCache {
    async fn get(&self, qr_code: &str) -> Result<Option<PassRecord>, CacheError> {
        let key = cache_key(qr_code);
        let now = Instant::now();

        {
            let entries = self.entries.read().await;

            match entries.get(&key) {
                None => return Ok(None),
                Some(entry) if entry.is_fresh(now) => return Ok(Some(entry.pass.clone())),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;

        // Re-check under the write lock, a concurrent set may have refreshed it.
        if entries.get(&key).is_some_and(|entry| !entry.is_fresh(now)) {
            entries.remove(&key);
        }

        Ok(entries
            .get(&key)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.pass.clone()))
    }

    async fn set(&self, qr_code: &str, pass: PassRecord, ttl: Duration) -> Result<(), CacheError> {
        let key = cache_key(qr_code);
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            entries.retain(|_, entry| entry.is_fresh(now));

            if entries.len() >= self.capacity {
                debug!(capacity = self.capacity, "pass cache full, skipping insert");

                return Ok(());
            }
        }

        entries.insert(
            key,
            CacheEntry {
                pass,
                expires_at: now + ttl,
            },
        );

        Ok(())
    }

    async fn delete(&self, qr_code: &str) -> Result<(), CacheError> {
        self.entries.write().await.remove(&cache_key(qr_code));

        Ok(())
    }
}
