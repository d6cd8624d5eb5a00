//! Compiled selector cache
//!
//! Decoupled logic repeats the same handful of selectors for every parse
//! of a template, so compiled selectors are kept in a bounded LRU cache
//! shared by all parses of a parser.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use super::MarkupSelector;
use crate::error::Result;

/// Thread-safe LRU cache of compiled selectors, keyed by source text.
pub struct SelectorCache {
    cache: Mutex<LruCache<String, Arc<MarkupSelector>>>,
}

impl SelectorCache {
    /// Cache holding at most `capacity` selectors (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        SelectorCache {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Compiled form of `selector`, compiling it on first use. Invalid
    /// selectors are not cached.
    pub fn get_or_compile(&self, selector: &str) -> Result<Arc<MarkupSelector>> {
        if let Some(compiled) = self.cache.lock().get(selector) {
            return Ok(Arc::clone(compiled));
        }

        let compiled = Arc::new(MarkupSelector::parse(selector)?);
        self.cache
            .lock()
            .put(selector.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cache.lock().cap().get()
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }
}

impl std::fmt::Debug for SelectorCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reuses_compiled_selector() {
        let cache = SelectorCache::new(4);
        let first = cache.get_or_compile("//div").unwrap();
        let second = cache.get_or_compile("//div").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = SelectorCache::new(2);
        let a = cache.get_or_compile("//a").unwrap();
        cache.get_or_compile("//b").unwrap();
        cache.get_or_compile("//a").unwrap();
        cache.get_or_compile("//c").unwrap();
        assert_eq!(cache.len(), 2);
        // "//a" was used more recently than "//b"
        assert!(Arc::ptr_eq(&a, &cache.get_or_compile("//a").unwrap()));
        assert_eq!(cache.capacity(), 2);
    }

    #[test]
    fn test_invalid_not_cached() {
        let cache = SelectorCache::new(2);
        assert!(cache.get_or_compile("div[").is_err());
        assert!(cache.is_empty());
        assert_eq!(SelectorCache::new(0).capacity(), 1);
    }
}
