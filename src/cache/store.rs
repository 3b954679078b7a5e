use super::byteview::ByteView;
use super::lru::{Lru, OnEvicted};

use parking_lot::Mutex;

/// Thread-safe bounded cache. Every operation takes the one mutex, so readers
/// never observe a half-applied insert or eviction.
pub struct Cache {
    lru: Mutex<Lru>,
}

impl Cache {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            lru: Mutex::new(Lru::new(max_bytes, None)),
        }
    }

    pub fn with_eviction_callback(max_bytes: usize, on_evicted: OnEvicted) -> Self {
        Self {
            lru: Mutex::new(Lru::new(max_bytes, Some(on_evicted))),
        }
    }

    pub fn get(&self, key: &str) -> Option<ByteView> {
        self.lru.lock().get(key)
    }

    pub fn add(&self, key: &str, value: ByteView) {
        self.lru.lock().add(key, value);
    }

    pub fn remove(&self, key: &str) -> Option<ByteView> {
        self.lru.lock().remove(key)
    }

    pub fn len(&self) -> usize {
        self.lru.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lru.lock().is_empty()
    }

    pub fn bytes(&self) -> usize {
        self.lru.lock().bytes()
    }
}
