//! Bounded, thread-safe text interning
//!
//! Texts are looked up by a 31-multiplier polynomial hash in a
//! fixed table of 3181 buckets. A hit returns the stored `Arc<str>`, so
//! repeated names and whitespace runs share one allocation.
//!
//! Memory is bounded by a character budget:
//! - removable entries are evicted strictly in insertion order (FIFO);
//!   reads never refresh an entry
//! - unremovable seed texts count toward the budget but are never evicted
//! - a text that does not fit even after evicting everything removable is
//!   returned without being stored
//!
//! Lookups take the read lock. A miss takes the write lock and looks
//! again before storing, so concurrent requests for the same text agree
//! on one instance.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;

use super::TextRepository;
use crate::util::text::{equals, hash_code, CharSequence, Fragments};

/// Number of buckets in the hash table (prime).
const TEXT_MAP_LEN: usize = 3181;
/// Initial capacity of the FIFO of removable entries.
const INITIAL_QUEUE_CAPACITY: usize = 1500;

#[derive(Debug, Clone)]
struct Entry {
    hash: i32,
    len: usize,
    text: Arc<str>,
}

#[derive(Debug)]
struct CacheState {
    buckets: Vec<Vec<Entry>>,
    /// Removable entries, oldest first
    fifo: VecDeque<Entry>,
    unremovable: usize,
    size: usize,
}

impl CacheState {
    fn find<S: CharSequence + ?Sized>(&self, hash: i32, text: &S) -> Option<Arc<str>> {
        self.buckets[bucket_index(hash)]
            .iter()
            .find(|entry| entry.hash == hash && equals(true, &*entry.text, text))
            .map(|entry| Arc::clone(&entry.text))
    }

    fn insert(&mut self, entry: Entry, removable: bool) {
        self.size += entry.len;
        self.buckets[bucket_index(entry.hash)].push(entry.clone());
        if removable {
            self.fifo.push_back(entry);
        } else {
            self.unremovable += 1;
        }
    }

    /// Drop the oldest removable entry. Returns false when nothing is left
    /// to evict.
    fn evict_oldest(&mut self) -> bool {
        let Some(oldest) = self.fifo.pop_front() else {
            return false;
        };
        let bucket = &mut self.buckets[bucket_index(oldest.hash)];
        if let Some(at) = bucket.iter().position(|e| Arc::ptr_eq(&e.text, &oldest.text)) {
            bucket.swap_remove(at);
        }
        self.size -= oldest.len;
        true
    }
}

#[inline]
fn bucket_index(hash: i32) -> usize {
    hash.unsigned_abs() as usize % TEXT_MAP_LEN
}

/// Hash and character length in one pass.
#[inline]
fn measure<S: CharSequence + ?Sized>(text: &S) -> (i32, usize) {
    (hash_code(text), text.seq_chars().count())
}

/// Interning text repository with a FIFO-evicted character budget.
#[derive(Debug)]
pub struct LimitedSizeCacheTextRepository {
    max_size: usize,
    state: RwLock<CacheState>,
}

impl LimitedSizeCacheTextRepository {
    /// Create a repository holding at most `max_size` characters.
    pub fn new(max_size: usize) -> Self {
        Self::with_unremovable(max_size, std::iter::empty::<&str>())
    }

    /// Create a repository pre-loaded with texts that are never evicted.
    /// Their size still counts toward `max_size`.
    pub fn with_unremovable<I, S>(max_size: usize, unremovable: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = CacheState {
            buckets: vec![Vec::new(); TEXT_MAP_LEN],
            fifo: VecDeque::with_capacity(INITIAL_QUEUE_CAPACITY),
            unremovable: 0,
            size: 0,
        };
        for text in unremovable {
            let text = text.as_ref();
            let (hash, len) = measure(text);
            if state.find(hash, text).is_none() {
                state.insert(Entry { hash, len, text: Arc::from(text) }, false);
            }
        }
        LimitedSizeCacheTextRepository {
            max_size,
            state: RwLock::new(state),
        }
    }

    fn intern<S, F>(&self, text: &S, materialize: F) -> Arc<str>
    where
        S: CharSequence + ?Sized,
        F: FnOnce() -> Arc<str>,
    {
        let (hash, len) = measure(text);

        if let Some(found) = self.state.read().find(hash, text) {
            return found;
        }

        let mut state = self.state.write();
        // Another writer may have stored it between the two locks
        if let Some(found) = state.find(hash, text) {
            return found;
        }

        let value = materialize();
        while state.size + len > self.max_size && state.evict_oldest() {}
        if state.size + len > self.max_size {
            log::trace!(
                "Text of {} chars exceeds the text cache budget of {} chars, not stored",
                len,
                self.max_size
            );
            return value;
        }
        state.insert(Entry { hash, len, text: Arc::clone(&value) }, true);
        value
    }

    /// Number of stored texts, unremovable ones included.
    pub fn len(&self) -> usize {
        let state = self.state.read();
        state.fifo.len() + state.unremovable
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Characters currently accounted.
    pub fn size(&self) -> usize {
        self.state.read().size
    }

    /// Character budget.
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl TextRepository for LimitedSizeCacheTextRepository {
    fn get_text(&self, text: &str) -> Arc<str> {
        self.intern(text, || Arc::from(text))
    }

    fn get_text_from_buffer(&self, buffer: &[char], offset: usize, len: usize) -> Arc<str> {
        let chars = &buffer[offset..offset + len];
        self.intern(chars, || chars.iter().collect::<String>().into())
    }

    fn get_text_concat(&self, fragments: &[&str]) -> Arc<str> {
        self.intern(&Fragments(fragments), || fragments.concat().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_same_instance_for_all_inputs() {
        let repo = LimitedSizeCacheTextRepository::new(1000);
        let a = repo.get_text("th:text");
        let buffer: Vec<char> = "<p th:text>".chars().collect();
        let b = repo.get_text_from_buffer(&buffer, 3, 7);
        let c = repo.get_text_concat(&["th", ":", "text"]);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &c));
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.size(), 7);
    }

    #[test]
    fn test_fifo_eviction() {
        let repo = LimitedSizeCacheTextRepository::new(10);
        let first = repo.get_text("aaaaa");
        let second = repo.get_text("bbbbb");
        // Reads do not refresh entries
        assert!(Arc::ptr_eq(&first, &repo.get_text("aaaaa")));

        let third = repo.get_text("ccccc");
        assert_eq!(repo.size(), 10);
        assert!(Arc::ptr_eq(&second, &repo.get_text("bbbbb")));
        assert!(Arc::ptr_eq(&third, &repo.get_text("ccccc")));

        // "aaaaa" was evicted: a new instance comes back
        let again = repo.get_text("aaaaa");
        assert_eq!(&*again, "aaaaa");
        assert!(!Arc::ptr_eq(&first, &again));
    }

    #[test]
    fn test_oversized_text_not_stored() {
        let repo = LimitedSizeCacheTextRepository::new(4);
        let big = repo.get_text("too long");
        assert_eq!(&*big, "too long");
        assert_eq!(repo.len(), 0);
        assert!(!Arc::ptr_eq(&big, &repo.get_text("too long")));
    }

    #[test]
    fn test_unremovable_survive_pressure() {
        let repo = LimitedSizeCacheTextRepository::with_unremovable(8, ["div", "\n"]);
        let div = repo.get_text("div");
        for text in ["one", "two", "six", "ten", "abcd"] {
            repo.get_text(text);
        }
        assert!(Arc::ptr_eq(&div, &repo.get_text("div")));
        assert!(repo.size() <= repo.max_size());
        // Only 4 chars of budget remain once the seeds are counted
        let big = repo.get_text("abcde");
        assert!(!Arc::ptr_eq(&big, &repo.get_text("abcde")));
    }

    #[test]
    fn test_case_sensitive_interning() {
        let repo = LimitedSizeCacheTextRepository::new(100);
        assert!(!Arc::ptr_eq(&repo.get_text("DIV"), &repo.get_text("div")));
    }

    #[test]
    fn test_concurrent_interning_agrees() {
        let repo = Arc::new(LimitedSizeCacheTextRepository::new(10_000));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || repo.get_text("shared"))
            })
            .collect();
        let results: Vec<Arc<str>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for text in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], text));
        }
    }
}
