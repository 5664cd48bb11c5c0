//! Capacity-bounded TTL cache of computed routes

use crate::AdjacencyKind;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Monotonic millisecond time source
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now_ms(&self) -> u64;
}

/// Wall time since the clock was created
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: instant::Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: instant::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to, for tests and simulations
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(start_ms),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now_ms
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Cache key; cruise altitude and adjacency both change which edges exist
///
/// Dijkstra and A* may settle different equal-cost paths, so the search kind is
/// part of the key too.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub origin: String,
    pub destination: String,
    pub cruise_altitude_ft: i32,
    pub adjacency: AdjacencyKind,
    pub heuristic: bool,
}

impl RouteKey {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        cruise_altitude_ft: i32,
        adjacency: AdjacencyKind,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            cruise_altitude_ft,
            adjacency,
            heuristic: false,
        }
    }

    /// Same key for a heuristic (A*) search
    pub fn a_star(mut self) -> Self {
        self.heuristic = true;
        self
    }
}

/// A cached route
#[derive(Debug, Clone, PartialEq)]
pub struct CachedRoute {
    /// Waypoint ids from origin to destination
    pub waypoint_ids: Vec<String>,
    /// No airway path existed, the ids are just origin and destination
    pub is_direct: bool,
    /// Dataset generation the route was computed against
    pub generation: u64,
    stored_at_ms: u64,
}

/// Lookup counters since creation or the last [`RouteCache::clear`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Lookups that found an entry past its TTL or from an older dataset
    pub expired: u64,
    pub entries: usize,
}

/// LRU cache with a time-to-live on every entry
///
/// Not synchronized; the database keeps it behind its own mutex, separate from the
/// store lock.
#[derive(Debug)]
pub struct RouteCache {
    entries: LruCache<RouteKey, CachedRoute>,
    ttl_ms: u64,
    clock: Arc<dyn Clock>,
    hits: u64,
    misses: u64,
    expired: u64,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl RouteCache {
    /// A zero capacity is raised to 1
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self::with_clock(capacity, ttl, Arc::new(MonotonicClock::new()))
    }

    pub fn with_clock(capacity: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            ttl_ms: ttl.as_millis() as u64,
            clock,
            hits: 0,
            misses: 0,
            expired: 0,
        }
    }

    /// Fresh route for `key` computed against `generation`
    ///
    /// An entry that is `ttl` old or older, or belongs to another generation, is
    /// removed and reported as a miss.
    pub fn lookup(&mut self, key: &RouteKey, generation: u64) -> Option<CachedRoute> {
        let now = self.clock.now_ms();
        let ttl_ms = self.ttl_ms;

        let fresh = match self.entries.get(key) {
            None => {
                self.misses += 1;
                tracing::debug!(origin = %key.origin, destination = %key.destination, "Route cache miss");
                return None;
            }
            Some(entry) => {
                now.saturating_sub(entry.stored_at_ms) < ttl_ms && entry.generation == generation
            }
        };

        if fresh {
            self.hits += 1;
            tracing::debug!(origin = %key.origin, destination = %key.destination, "Route cache hit");
            self.entries.peek(key).cloned()
        } else {
            self.entries.pop(key);
            self.expired += 1;
            self.misses += 1;
            tracing::debug!(origin = %key.origin, destination = %key.destination, "Route cache entry expired");
            None
        }
    }

    /// Insert or overwrite, evicting the least recently used entry when full
    pub fn store(&mut self, key: RouteKey, waypoint_ids: Vec<String>, is_direct: bool, generation: u64) {
        let entry = CachedRoute {
            waypoint_ids,
            is_direct,
            generation,
            stored_at_ms: self.clock.now_ms(),
        };
        self.entries.put(key, entry);
    }

    /// Drop every entry and reset the counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
        self.expired = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            expired: self.expired,
            entries: self.entries.len(),
        }
    }
}

/// Lock the cache, recovering from a poisoned mutex
///
/// Cache contents are always valid on their own, so a panic in another holder does not
/// invalidate them.
pub(crate) fn lock(cache: &Mutex<RouteCache>) -> MutexGuard<'_, RouteCache> {
    match cache.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("Route cache mutex poisoned; recovering");
            poisoned.into_inner()
        }
    }
}
