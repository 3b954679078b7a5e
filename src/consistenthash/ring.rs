use std::collections::HashMap;
use std::sync::Arc;

/// Pluggable 32-bit hash over raw bytes.
pub type HashFn = Arc<dyn Fn(&[u8]) -> u32 + Send + Sync>;

pub const DEFAULT_REPLICAS: usize = 50;

pub fn crc32_hash(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Sorted ring of virtual positions, each owned by exactly one peer.
#[derive(Clone)]
pub struct Ring {
    hash: HashFn,
    replicas: usize,
    /// Sorted ascending.
    positions: Vec<u32>,
    owners: HashMap<u32, String>,
}

impl Ring {
    pub fn new(replicas: usize, hash: Option<HashFn>) -> Self {
        let hash: HashFn = match hash {
            Some(hash) => hash,
            None => Arc::new(crc32_hash),
        };
        Self {
            hash,
            replicas: replicas.max(1),
            positions: Vec::new(),
            owners: HashMap::new(),
        }
    }

    /// Replaces the whole peer set.
    pub fn set_peers<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.positions.clear();
        self.owners.clear();
        self.add(peers);
    }

    /// Adds peers on top of the current set.
    pub fn add<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for peer in peers {
            let peer = peer.as_ref();
            for i in 0..self.replicas {
                let position = (self.hash)(format!("{}{}", i, peer).as_bytes());
                if self.owners.insert(position, peer.to_string()).is_none() {
                    self.positions.push(position);
                }
            }
        }
        self.positions.sort_unstable();
    }

    /// Owner of `key`, or `None` while the ring is empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.positions.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.positions.partition_point(|&position| position < hash);
        let position = self.positions[idx % self.positions.len()];

        self.owners.get(&position).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of virtual positions on the ring.
    pub fn len(&self) -> usize {
        self.positions.len()
    }
}

impl Default for Ring {
    fn default() -> Self {
        Self::new(DEFAULT_REPLICAS, None)
    }
}

impl std::fmt::Debug for Ring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ring")
            .field("replicas", &self.replicas)
            .field("positions", &self.positions.len())
            .finish()
    }
}
