use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use lru::LruCache;

/// Entries kept by a [MemoryCache] unless configured otherwise
pub const DEFAULT_CAPACITY: usize = 1024;

/// Minimum time between two sweeps of expired entries
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Key/value store with a per-entry time-to-live.
///
/// A read past an entry's expiry must behave exactly like a miss.
/// A zero `ttl` means the entry never expires on its own.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, returns whether the store accepted it
    fn set(&self, key: &str, value: String, ttl: Duration) -> bool;
}

impl<C: CacheStore + ?Sized> CacheStore for Arc<C> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String, ttl: Duration) -> bool {
        (**self).set(key, value, ttl)
    }
}

/// A cached value and the instant it stops being valid.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Option<SystemTime>,
}

impl CacheEntry {
    fn is_expired(&self, now: SystemTime) -> bool {
        match self.expires_at {
            Some(expires_at) => now >= expires_at,
            None => false,
        }
    }
}

struct Entries {
    lru: LruCache<String, CacheEntry>,
    last_sweep: SystemTime,
}

impl Entries {
    /// Drops every expired entry, returns how many were dropped
    fn sweep(&mut self, now: SystemTime) -> usize {
        let expired: Vec<String> = self
            .lru
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            self.lru.pop(key);
        }
        self.last_sweep = now;
        expired.len()
    }
}

type Clock = Arc<dyn Fn() -> SystemTime + Send + Sync>;

/// In-process [CacheStore] bounded by entry count.
///
/// A read that finds an entry stale drops it. Writes also sweep out
/// expired entries, at most once per minute, and evict the least recently
/// used entry once the cache is full.
pub struct MemoryCache {
    /// Label for logging
    label: String,
    entries: Mutex<Entries>,
    clock: Clock,
}

impl MemoryCache {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_clock(label, SystemTime::now)
    }

    /// Creates a cache reading the current time from `clock`
    pub fn with_clock(
        label: impl Into<String>,
        clock: impl Fn() -> SystemTime + Send + Sync + 'static,
    ) -> Self {
        let label = label.into();
        let now = clock();
        log::debug!(
            "cache/{}: initialized with {} entries limit",
            label,
            DEFAULT_CAPACITY
        );
        Self {
            label,
            entries: Mutex::new(Entries {
                lru: LruCache::new(capacity(DEFAULT_CAPACITY)),
                last_sweep: now,
            }),
            clock: Arc::new(clock),
        }
    }

    /// Limits the cache to `max_entries`, evicting the least recently used
    /// ones if it already holds more. Zero is treated as one.
    pub fn with_capacity(self, max_entries: usize) -> Self {
        if let Ok(mut entries) = self.entries.lock() {
            entries.lru.resize(capacity(max_entries));
        }
        log::debug!(
            "cache/{}: limited to {} entries",
            self.label,
            max_entries.max(1)
        );
        self
    }

    pub fn capacity(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| entries.lru.cap().get())
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| entries.lru.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn capacity(max_entries: usize) -> NonZeroUsize {
    NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN)
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let now = (self.clock)();
        let mut entries = self.entries.lock().ok()?;

        match entries.lru.get(key) {
            None => {
                log::debug!("cache/{}: miss for key {}", self.label, key);
                return None;
            }
            Some(entry) if !entry.is_expired(now) => {
                log::debug!("cache/{}: hit for key {}", self.label, key);
                return Some(entry.value.clone());
            }
            Some(_) => {}
        }

        log::debug!("cache/{}: key {} expired", self.label, key);
        entries.lru.pop(key);
        None
    }

    fn set(&self, key: &str, value: String, ttl: Duration) -> bool {
        let now = (self.clock)();
        let expires_at = if ttl.is_zero() { None } else { Some(now + ttl) };

        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(_) => {
                log::error!(
                    "cache/{}: lock poisoned, dropping {}",
                    self.label,
                    key
                );
                return false;
            }
        };

        let due = now
            .duration_since(entries.last_sweep)
            .map_or(false, |elapsed| elapsed >= SWEEP_INTERVAL);
        if due {
            let dropped = entries.sweep(now);
            if dropped > 0 {
                log::debug!(
                    "cache/{}: dropped {} expired entries",
                    self.label,
                    dropped
                );
            }
        }

        let evicted = entries
            .lru
            .push(key.to_owned(), CacheEntry { value, expires_at });
        if let Some((old_key, _)) = evicted.filter(|(old_key, _)| old_key != key)
        {
            log::debug!("cache/{}: evicted key {}", self.label, old_key);
        }
        log::debug!(
            "cache/{}: set key={} ttl={}s",
            self.label,
            key,
            ttl.as_secs()
        );
        true
    }
}
