//! Byte-bounded LRU map.
//!
//! Recency bookkeeping is delegated to `lru::LruCache` (used unbounded); this
//! type adds byte accounting and evicts from the cold end until the total
//! fits the configured budget.

use super::byteview::ByteView;
use lru::LruCache;

/// Invoked once per entry evicted to make room. Not called for explicit removals.
pub type OnEvicted = Box<dyn Fn(&str, &ByteView) + Send + Sync>;

pub struct Lru {
    /// `0` means unbounded.
    max_bytes: usize,
    n_bytes: usize,
    entries: LruCache<String, ByteView>,
    on_evicted: Option<OnEvicted>,
}

impl Lru {
    pub fn new(max_bytes: usize, on_evicted: Option<OnEvicted>) -> Self {
        Self {
            max_bytes,
            n_bytes: 0,
            entries: LruCache::unbounded(),
            on_evicted,
        }
    }

    /// Looks up `key` and marks it most recently used.
    pub fn get(&mut self, key: &str) -> Option<ByteView> {
        self.entries.get(key).cloned()
    }

    /// Membership check that leaves recency untouched.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Inserts or replaces `key`, then evicts least recently used entries until
    /// the byte total is back within budget.
    ///
    /// An entry larger than the whole budget is evicted immediately along with
    /// everything else.
    pub fn add(&mut self, key: &str, value: ByteView) {
        self.n_bytes += key.len() + value.len();
        if let Some((old_key, old_value)) = self.entries.push(key.to_string(), value) {
            self.n_bytes -= old_key.len() + old_value.len();
        }

        while self.max_bytes != 0 && self.n_bytes > self.max_bytes {
            if self.remove_oldest().is_none() {
                break;
            }
        }
    }

    /// Evicts the least recently used entry, firing the eviction callback.
    pub fn remove_oldest(&mut self) -> Option<(String, ByteView)> {
        let (key, value) = self.entries.pop_lru()?;
        self.n_bytes -= key.len() + value.len();
        if let Some(on_evicted) = &self.on_evicted {
            on_evicted(&key, &value);
        }
        Some((key, value))
    }

    /// Explicit deletion.
    pub fn remove(&mut self, key: &str) -> Option<ByteView> {
        let value = self.entries.pop(key)?;
        self.n_bytes -= key.len() + value.len();
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes currently retained (keys + values).
    pub fn bytes(&self) -> usize {
        self.n_bytes
    }
}
