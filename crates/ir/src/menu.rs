//! External menu resolution
//!
//! Navigation menus live in a separate service. Resolution goes through a
//! TTL cache keyed by (microservice, user): a fresh entry short-circuits the
//! fetch, a successful fetch refreshes the entry, and a failed fetch falls
//! back to whatever stale entry exists rather than failing the caller. Only
//! a failure with no cached entry at all becomes an error.
//!
//! The TTL and the clock are injected so expiry is testable without real
//! waiting.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::Menu;
use forge_core::{EngineError, EngineResult, MicroserviceId};

/// Default cache lifetime for resolved menus
pub const DEFAULT_MENU_TTL_SECS: i64 = 300;

// ============================================================================
// Clock
// ============================================================================

/// Time source for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ============================================================================
// Fetcher
// ============================================================================

/// Source of menus for a (microservice, user) pair.
///
/// Implemented over whatever transport reaches the menu service; tests use
/// an in-memory stub.
pub trait MenuFetcher: Send + Sync {
    fn fetch_menus(
        &self,
        microservice_id: MicroserviceId,
        user_id: Uuid,
    ) -> impl Future<Output = EngineResult<Vec<Menu>>> + Send;
}

// ============================================================================
// Cache
// ============================================================================

#[derive(Debug, Clone)]
struct CacheEntry {
    menus: Vec<Menu>,
    fetched_at: DateTime<Utc>,
}

/// TTL cache over resolved menu sets.
///
/// Entries past their TTL are not evicted; they stay behind as the stale
/// fallback for fetch failures. Concurrent refreshes of the same key are
/// last-write-wins, which is harmless: both writers hold equally fresh data.
#[derive(Debug)]
pub struct MenuCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MenuCache {
    /// Create a cache with the given entry lifetime
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn key(microservice_id: MicroserviceId, user_id: Uuid) -> String {
        format!("{}::{}", microservice_id, user_id)
    }

    /// Cached menus if the entry is within its TTL
    fn get_fresh(&self, key: &str, now: DateTime<Utc>) -> Option<Vec<Menu>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|entry| now - entry.fetched_at < self.ttl)
            .map(|entry| entry.menus.clone())
    }

    /// Cached menus regardless of age
    fn get_stale(&self, key: &str) -> Option<Vec<Menu>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).map(|entry| entry.menus.clone())
    }

    fn insert(&self, key: String, menus: Vec<Menu>, now: DateTime<Utc>) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key,
            CacheEntry {
                menus,
                fetched_at: now,
            },
        );
    }

    /// Number of cached (microservice, user) entries
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MenuCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_MENU_TTL_SECS))
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Menu resolver combining a fetcher, a TTL cache, and a clock.
#[derive(Debug)]
pub struct MenuResolver<F: MenuFetcher, C: Clock = SystemClock> {
    fetcher: F,
    cache: MenuCache,
    clock: C,
}

impl<F: MenuFetcher> MenuResolver<F, SystemClock> {
    /// Create a resolver with the default TTL and wall-clock time
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            cache: MenuCache::default(),
            clock: SystemClock,
        }
    }
}

impl<F: MenuFetcher, C: Clock> MenuResolver<F, C> {
    /// Create a resolver with an explicit cache and clock
    pub fn with_cache(fetcher: F, cache: MenuCache, clock: C) -> Self {
        Self {
            fetcher,
            cache,
            clock,
        }
    }

    /// Resolve the menus for a (microservice, user) pair.
    ///
    /// A fresh cache entry is returned without touching the fetcher. On a
    /// fetch failure the most recent stale entry is served instead; the
    /// failure only propagates when nothing was ever cached for the pair.
    pub async fn resolve(
        &self,
        microservice_id: MicroserviceId,
        user_id: Uuid,
    ) -> EngineResult<Vec<Menu>> {
        let key = MenuCache::key(microservice_id, user_id);
        let now = self.clock.now();

        if let Some(menus) = self.cache.get_fresh(&key, now) {
            debug!(%microservice_id, %user_id, "menu cache hit");
            return Ok(menus);
        }

        match self.fetcher.fetch_menus(microservice_id, user_id).await {
            Ok(menus) => {
                self.cache.insert(key, menus.clone(), now);
                Ok(menus)
            }
            Err(err) => {
                if let Some(menus) = self.cache.get_stale(&key) {
                    warn!(%microservice_id, %user_id, error = %err,
                        "menu fetch failed; serving stale cache entry");
                    return Ok(menus);
                }
                Err(EngineError::internal(format!(
                    "menu fetch failed with no cached fallback: {}",
                    err
                )))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
