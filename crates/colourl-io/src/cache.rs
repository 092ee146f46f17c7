use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::CacheError;

/// Stores rendered responses by request key.
pub trait ResponseCache {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError>;
}

impl<T: ResponseCache + ?Sized> ResponseCache for &T {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        (**self).set(key, value)
    }
}

/// A cache that never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl ResponseCache for NoCache {
    fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _key: &str, _value: Vec<u8>) -> Result<(), CacheError> {
        Ok(())
    }
}

struct CacheEntry {
    value: Vec<u8>,
    // None when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

#[derive(Default)]
struct LruState {
    map: HashMap<String, CacheEntry>,
    lru: VecDeque<String>,
}

impl LruState {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.lru.iter().position(|k| k == key) {
            if let Some(k) = self.lru.remove(pos) {
                self.lru.push_back(k);
            }
        }
    }

    fn remove(&mut self, key: &str) {
        self.map.remove(key);
        self.lru.retain(|k| k != key);
    }

    fn evict_if_needed(&mut self, capacity: usize) {
        while self.map.len() > capacity {
            let Some(old_key) = self.lru.pop_front() else {
                break;
            };
            self.map.remove(&old_key);
        }
    }
}

/// Bounded in-memory LRU cache with per-entry expiry.
///
/// Safe to share between threads; every operation takes an internal lock.
pub struct MemoryCache {
    state: Mutex<LruState>,
    capacity: usize,
    ttl: Duration,
}

impl MemoryCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            state: Mutex::new(LruState::default()),
            capacity,
            ttl,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored entries, expired ones included until they are next read.
    pub fn len(&self) -> usize {
        self.state.lock().map(|state| state.map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .field("len", &self.len())
            .finish()
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut state = self.state.lock().ok()?;
        let expired = state
            .map
            .get(key)?
            .expires_at
            .is_some_and(|at| at <= Instant::now());
        if expired {
            state.remove(key);
            return None;
        }
        state.touch(key);
        state.map.get(key).map(|entry| entry.value.clone())
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        if self.capacity == 0 {
            return Ok(());
        }
        let mut state = self.state.lock().map_err(|_| CacheError::Poisoned)?;
        let entry = CacheEntry {
            value,
            expires_at: Instant::now().checked_add(self.ttl),
        };
        if state.map.insert(key.to_string(), entry).is_some() {
            state.touch(key);
        } else {
            state.lru.push_back(key.to_string());
        }
        state.evict_if_needed(self.capacity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    #[test]
    fn stores_and_returns_values() {
        let cache = MemoryCache::new(2, DAY);
        cache.set("a", b"one".to_vec()).unwrap();
        assert_eq!(cache.get("a"), Some(b"one".to_vec()));
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = MemoryCache::new(2, DAY);
        cache.set("a", vec![1]).unwrap();
        cache.set("b", vec![2]).unwrap();
        // Reading "a" makes "b" the eviction candidate.
        assert!(cache.get("a").is_some());
        cache.set("c", vec![3]).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(vec![1]));
        assert_eq!(cache.get("c"), Some(vec![3]));
    }

    #[test]
    fn overwriting_refreshes_position() {
        let cache = MemoryCache::new(2, DAY);
        cache.set("a", vec![1]).unwrap();
        cache.set("b", vec![2]).unwrap();
        cache.set("a", vec![9]).unwrap();
        cache.set("c", vec![3]).unwrap();
        assert_eq!(cache.get("a"), Some(vec![9]));
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn expired_entries_are_dropped() {
        let cache = MemoryCache::new(4, Duration::ZERO);
        cache.set("a", vec![1]).unwrap();
        assert_eq!(cache.get("a"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let cache = MemoryCache::new(0, DAY);
        cache.set("a", vec![1]).unwrap();
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn no_cache_always_misses() {
        NoCache.set("a", vec![1]).unwrap();
        assert_eq!(NoCache.get("a"), None);
    }
}
