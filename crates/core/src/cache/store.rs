//! Bounded in-memory cache with per-entry expiry.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Snapshot of a cache's occupancy and configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CacheStatus {
    pub size: usize,
    pub max_size: usize,
    pub ttl_seconds: u64,
    pub hits: u64,
    pub misses: u64,
}

struct Entry<V> {
    value: Arc<V>,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

/// Thread-safe LRU cache whose entries expire after a TTL.
///
/// Values are stored behind `Arc` and replaced wholesale on write, so a reader
/// holding a value never observes a later `put`. Expired entries are removed
/// when a read finds them; capacity overflow evicts the least recently used
/// entry.
pub struct TtlCache<K, V> {
    inner: Mutex<LruCache<K, Entry<V>>>,
    max_size: usize,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K: Hash + Eq, V> TtlCache<K, V> {
    /// Create a cache holding at most `max_size` entries (minimum 1).
    ///
    /// `ttl` is the lifetime reported by [`TtlCache::status`]; writers pass
    /// their own to [`TtlCache::put`].
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(max_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            max_size: capacity.get(),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a live entry. An expired entry is removed and reported as a miss.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let mut cache = self.inner.lock();

        let live = match cache.get(key) {
            Some(entry) if entry.expires_at.is_none_or(|at| Instant::now() <= at) => Some(Arc::clone(&entry.value)),
            Some(_) => {
                cache.pop(key);
                None
            }
            None => None,
        };

        match live {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a value with an explicit TTL, replacing any previous entry for the key.
    pub fn put(&self, key: K, value: V, ttl: Duration) -> Arc<V> {
        let value = Arc::new(value);
        let entry = Entry { value: Arc::clone(&value), expires_at: Instant::now().checked_add(ttl) };
        self.inner.lock().put(key, entry);
        value
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Number of stored entries, including expired ones not yet touched.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn status(&self) -> CacheStatus {
        CacheStatus {
            size: self.len(),
            max_size: self.max_size,
            ttl_seconds: self.ttl.as_secs(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn test_put_and_get() {
        let cache: TtlCache<String, Vec<u32>> = TtlCache::new(10, Duration::from_secs(60));
        cache.put("a".into(), vec![1, 2, 3], MINUTE);

        let value = cache.get(&"a".to_string()).unwrap();
        assert_eq!(*value, vec![1, 2, 3]);
        assert!(cache.get(&"missing".to_string()).is_none());
    }

    #[test]
    fn test_expiry_is_a_miss() {
        let cache: TtlCache<&str, u32> = TtlCache::new(10, Duration::from_secs(60));
        cache.put("short", 1, Duration::from_millis(20));
        cache.put("long", 2, Duration::from_secs(60));

        std::thread::sleep(Duration::from_millis(50));

        assert!(cache.get(&"short").is_none());
        assert_eq!(cache.get(&"long").as_deref(), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lru_eviction() {
        let cache: TtlCache<&str, u32> = TtlCache::new(2, Duration::from_secs(60));
        cache.put("a", 1, MINUTE);
        cache.put("b", 2, MINUTE);

        // touch "a" so "b" becomes least recently used
        assert!(cache.get(&"a").is_some());
        cache.put("c", 3, MINUTE);

        assert!(cache.get(&"b").is_none());
        assert!(cache.get(&"a").is_some());
        assert!(cache.get(&"c").is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_replace_on_write() {
        let cache: TtlCache<&str, Vec<u32>> = TtlCache::new(4, Duration::from_secs(60));
        cache.put("k", vec![1], MINUTE);
        let before = cache.get(&"k").unwrap();

        cache.put("k", vec![2, 3], MINUTE);
        let after = cache.get(&"k").unwrap();

        assert_eq!(*before, vec![1]);
        assert_eq!(*after, vec![2, 3]);
    }

    #[test]
    fn test_clear_and_status() {
        let cache: TtlCache<&str, u32> = TtlCache::new(100, Duration::from_secs(300));
        cache.put("a", 1, MINUTE);
        cache.get(&"a");
        cache.get(&"b");

        let status = cache.status();
        assert_eq!(status.size, 1);
        assert_eq!(status.max_size, 100);
        assert_eq!(status.ttl_seconds, 300);
        assert_eq!(status.hits, 1);
        assert_eq!(status.misses, 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_unrepresentable_ttl_never_expires() {
        let cache: TtlCache<&str, u32> = TtlCache::new(4, Duration::MAX);
        cache.put("k", 7, Duration::MAX);
        cache.put("secs", 8, Duration::from_secs(u64::MAX));

        assert_eq!(cache.get(&"k").as_deref(), Some(&7));
        assert_eq!(cache.get(&"secs").as_deref(), Some(&8));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let cache: TtlCache<&str, u32> = TtlCache::new(0, Duration::from_secs(1));
        assert_eq!(cache.status().max_size, 1);
    }

    #[test]
    fn test_concurrent_writers() {
        let cache: Arc<TtlCache<u32, u32>> = Arc::new(TtlCache::new(1000, Duration::from_secs(60)));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        cache.put(t * 100 + i, i, MINUTE);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 800);
    }
}
