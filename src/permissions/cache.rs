/*!
 * Resolution Cache
 * Memoized resolution results keyed by user and world
 *
 * Entries remember the registry version they were computed against; a
 * lookup with a different version is a miss, so publishing a new registry
 * invalidates everything without touching the map.
 */

use super::types::Resolved;
use ahash::RandomState;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Cache key for resolution lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    user: String,
    world: Option<String>,
}

impl CacheKey {
    fn new(user: &str, world: Option<&str>) -> Self {
        Self {
            user: user.to_string(),
            world: world.map(str::to_string),
        }
    }
}

struct CachedResolution {
    resolved: Arc<Resolved>,
    version: u64,
}

/// Resolution cache with bounded size
pub struct ResolutionCache {
    cache: DashMap<CacheKey, CachedResolution, RandomState>,
    max_size: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResolutionCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            cache: DashMap::with_capacity_and_hasher(max_size.min(1024), RandomState::new()),
            max_size,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cached result for `user` in `world`, if computed against `version`
    pub fn get(&self, user: &str, world: Option<&str>, version: u64) -> Option<Arc<Resolved>> {
        let key = CacheKey::new(user, world);

        if let Some(entry) = self.cache.get(&key) {
            if entry.version == version {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(Arc::clone(&entry.resolved));
            }
            // Stale registry version
            drop(entry);
            self.cache.remove(&key);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn put(&self, user: &str, world: Option<&str>, version: u64, resolved: Arc<Resolved>) {
        if self.max_size == 0 {
            return;
        }

        // Simple size limit - remove an arbitrary entry if full.
        // The iterator holds a shard read guard, so it must be gone before `remove`.
        if self.cache.len() >= self.max_size {
            let victim = self.cache.iter().next().map(|entry| entry.key().clone());
            if let Some(key) = victim {
                self.cache.remove(&key);
            }
        }

        self.cache.insert(
            CacheKey::new(user, world),
            CachedResolution { resolved, version },
        );
    }

    /// Drop every world's entry for a user
    pub fn invalidate_user(&self, user: &str) {
        self.cache.retain(|k, _| k.user != user);
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            size: self.cache.len(),
            max_size: self.max_size,
            hits,
            misses,
            hit_rate,
        }
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new(crate::core::limits::DEFAULT_RESOLUTION_CACHE_SIZE)
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}
