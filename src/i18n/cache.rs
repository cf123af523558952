use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use thiserror::Error;

/// Error from a cache backend.
///
/// The cache is a soft dependency: callers log and fall through to the
/// resource files when either operation fails.
#[derive(Debug, Error)]
#[error("Cache backend error: {0}")]
pub struct CacheError(pub String);

/// Pluggable resolved-string cache, keyed by (culture, key) pairs.
///
/// Entries are idempotent re-derivations of the resource files, so
/// implementations are free to evict or expire them at any time, and
/// concurrent writes to the same key need no ordering guarantee.
pub trait StringCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;
}

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1024) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// Bounded in-process cache with least-recently-used eviction.
pub struct MemoryCache {
    entries: Mutex<LruCache<String, String>>,
}

impl MemoryCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl StringCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CacheError("memory cache mutex poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CacheError("memory cache mutex poisoned".to_string()))?;
        entries.put(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_returns_values() {
        let cache = MemoryCache::default();
        cache.set("locale_en-US_greeting", "Hello").unwrap();
        assert_eq!(
            cache.get("locale_en-US_greeting").unwrap().as_deref(),
            Some("Hello")
        );
        assert_eq!(cache.get("locale_en-US_missing").unwrap(), None);
    }

    #[test]
    fn overwrites_existing_entries() {
        let cache = MemoryCache::default();
        cache.set("k", "one").unwrap();
        cache.set("k", "two").unwrap();
        assert_eq!(cache.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn evicts_least_recently_used_at_capacity() {
        let cache = MemoryCache::new(NonZeroUsize::new(2).unwrap());
        cache.set("a", "1").unwrap();
        cache.set("b", "2").unwrap();
        // Touch "a" so "b" becomes the eviction candidate.
        cache.get("a").unwrap();
        cache.set("c", "3").unwrap();

        assert_eq!(cache.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(cache.get("b").unwrap(), None);
        assert_eq!(cache.get("c").unwrap().as_deref(), Some("3"));
    }
}
