use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::types::Draw;

/// Entries older than this are treated as absent (24 hours).
pub const DEFAULT_TTL_SECS: i64 = 24 * 60 * 60;

pub fn default_ttl() -> Duration {
    Duration::seconds(DEFAULT_TTL_SECS)
}

/// Source of the current time for cache stamping and expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Used to exercise expiry.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A cached value and the moment it was stored
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub captured_at: DateTime<Utc>,
}

/// In-memory string-keyed cache with lazy TTL expiry.
///
/// Expired entries are dropped by the lookup that finds them; there is no
/// background sweep and no capacity bound. One mutex guards the whole map, so
/// `get` and `set` are atomic per key.
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
}

/// Cache of draws keyed by `draw-<round>`.
pub type DrawCache = TtlCache<Draw>;

impl<V: Clone> TtlCache<V> {
    /// Create an empty cache with the default 24h TTL and the wall clock
    pub fn new() -> Self {
        Self::with_clock(default_ttl(), Arc::new(SystemClock))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expired: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a live entry. An expired entry is removed and reported as absent.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.lock();

        let expired = match entries.get(key) {
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            Some(entry) => self.clock.now() - entry.captured_at > self.ttl,
        };

        if expired {
            entries.remove(key);
            self.expired.fetch_add(1, Ordering::Relaxed);
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        entries.get(key).map(|e| e.value.clone())
    }

    /// Store `value` under `key`, replacing any previous entry and restarting its TTL.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let entry = CacheEntry {
            value,
            captured_at: self.clock.now(),
        };
        self.lock().insert(key.into(), entry);
    }

    /// Raw presence check. Does not apply expiry.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
        }
    }

    // A panic while holding the lock cannot leave a half-written entry behind,
    // so a poisoned map is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn manual_cache() -> (TtlCache<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 12, 21, 12, 0, 0).unwrap(),
        ));
        let cache = TtlCache::with_clock(default_ttl(), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_set_then_get() {
        let (cache, _clock) = manual_cache();
        cache.set("draw-1", "one".to_string());
        assert_eq!(cache.get("draw-1"), Some("one".to_string()));
        assert_eq!(cache.get("draw-2"), None);
    }

    #[test]
    fn test_set_overwrites_and_restamps() {
        let (cache, clock) = manual_cache();
        cache.set("k", "old".to_string());
        clock.advance(Duration::hours(20));
        cache.set("k", "new".to_string());
        clock.advance(Duration::hours(20));

        // 40h after the first write but only 20h after the second.
        assert_eq!(cache.get("k"), Some("new".to_string()));
    }

    #[test]
    fn test_entry_valid_at_exact_ttl() {
        let (cache, clock) = manual_cache();
        cache.set("k", "v".to_string());
        clock.advance(default_ttl());
        assert_eq!(cache.get("k"), Some("v".to_string()));
    }

    #[test]
    fn test_expired_entry_is_evicted_on_read() {
        let (cache, clock) = manual_cache();
        cache.set("k", "v".to_string());
        clock.advance(default_ttl() + Duration::seconds(1));

        // Still physically present until something reads it.
        assert!(cache.contains_key("k"));
        assert_eq!(cache.get("k"), None);
        assert!(!cache.contains_key("k"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_stats() {
        let (cache, clock) = manual_cache();
        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());
        cache.get("a");
        cache.get("missing");
        clock.advance(Duration::days(2));
        cache.get("b");

        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                hits: 1,
                misses: 2,
                expired: 1,
            }
        );
    }

    #[test]
    fn test_concurrent_writers_same_key() {
        let cache = Arc::new(TtlCache::<u32>::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        cache.set("shared", i);
                        assert!(cache.get("shared").is_some());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(cache.len(), 1);
        assert!(cache.get("shared").unwrap() < 8);
    }
}
