//! Cache Group Implementation
//!
//! Ties the local cache, the call deduplication table and the peer set together
//! behind a single `get`.

use super::peers::{PeerGetter, PeerPicker};
use super::types::{GroupStats, LoaderFn, RemoteFailurePolicy, Request, StatsSnapshot};
use crate::cache::{ByteView, Cache};
use crate::error::{CacheError, Result};
use crate::singleflight::CallGroup;

use once_cell::sync::OnceCell;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub struct Group {
    name: String,
    loader: LoaderFn,
    main_cache: Cache,
    peers: OnceCell<Arc<dyn PeerPicker>>,
    in_flight: CallGroup<ByteView>,
    policy: RemoteFailurePolicy,
    stats: Arc<GroupStats>,
}

impl Group {
    /// Creates an unregistered group.
    ///
    /// # Arguments
    /// * `cache_bytes` - Byte budget of the local cache (`0` = unbounded).
    /// * `loader` - Called with the key on a miss this node is responsible for.
    pub fn new<F, Fut>(name: &str, cache_bytes: usize, loader: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Vec<u8>>> + Send + 'static,
    {
        let loader: LoaderFn = Arc::new(move |key: String| {
            Box::pin(loader(key)) as Pin<Box<dyn Future<Output = anyhow::Result<Vec<u8>>> + Send>>
        });

        let stats = Arc::new(GroupStats::default());
        let eviction_stats = stats.clone();
        let main_cache = Cache::with_eviction_callback(
            cache_bytes,
            Box::new(move |_key: &str, _value: &ByteView| {
                GroupStats::incr(&eviction_stats.evictions);
            }),
        );

        Self {
            name: name.to_string(),
            loader,
            main_cache,
            peers: OnceCell::new(),
            in_flight: CallGroup::new(),
            policy: RemoteFailurePolicy::default(),
            stats,
        }
    }

    pub fn with_remote_failure_policy(mut self, policy: RemoteFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn remote_failure_policy(&self) -> RemoteFailurePolicy {
        self.policy
    }

    /// Attaches the peer set. Allowed once per group.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers
            .set(peers)
            .map_err(|_| CacheError::PeersAlreadyRegistered(self.name.clone()))
    }

    /// Returns the value for `key`, loading it on a miss.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey);
        }

        GroupStats::incr(&self.stats.gets);

        if let Some(value) = self.lookup_cache(key) {
            tracing::debug!("[{}] cache hit for key {}", self.name, key);
            return Ok(value);
        }

        self.load(key).await
    }

    /// Drops `key` from this node's cache. Peers are not told.
    pub fn evict(&self, key: &str) -> Option<ByteView> {
        self.main_cache.remove(key)
    }

    pub fn stats(&self) -> StatsSnapshot {
        let mut snapshot = self.stats.snapshot();
        snapshot.cache_items = self.main_cache.len();
        snapshot.cache_bytes = self.main_cache.bytes();
        snapshot
    }

    fn lookup_cache(&self, key: &str) -> Option<ByteView> {
        let value = self.main_cache.get(key)?;
        GroupStats::incr(&self.stats.cache_hits);
        Some(value)
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        self.in_flight
            .run(key, || async {
                // A previous wave may have filled the cache after our miss.
                if let Some(value) = self.lookup_cache(key) {
                    return Ok(value);
                }

                GroupStats::incr(&self.stats.loads);

                if let Some(picker) = self.peers.get()
                    && let Some(peer) = picker.pick_peer(key)
                {
                    match self.get_from_peer(peer.as_ref(), key).await {
                        Ok(value) => {
                            self.populate_cache(key, value.clone());
                            return Ok(value);
                        }
                        Err(e) => {
                            GroupStats::incr(&self.stats.peer_errors);
                            // Only transport-level failures may be papered over locally.
                            let policy = if e.is_remote() {
                                self.policy
                            } else {
                                RemoteFailurePolicy::Propagate
                            };
                            match policy {
                                RemoteFailurePolicy::Propagate => {
                                    tracing::warn!(
                                        "[{}] failed to get {} from peer {}: {}",
                                        self.name,
                                        key,
                                        peer.peer(),
                                        e
                                    );
                                    return Err(e);
                                }
                                RemoteFailurePolicy::FallbackLocal => {
                                    tracing::warn!(
                                        "[{}] failed to get {} from peer {}, loading locally: {}",
                                        self.name,
                                        key,
                                        peer.peer(),
                                        e
                                    );
                                }
                            }
                        }
                    }
                }

                let value = self.get_locally(key).await?;
                self.populate_cache(key, value.clone());
                Ok(value)
            })
            .await
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        match (self.loader)(key.to_string()).await {
            Ok(bytes) => {
                GroupStats::incr(&self.stats.local_loads);
                tracing::debug!("[{}] loaded key {} locally", self.name, key);
                Ok(ByteView::from(bytes))
            }
            Err(e) => {
                GroupStats::incr(&self.stats.local_load_errs);
                tracing::debug!("[{}] loader failed for key {}: {}", self.name, key, e);
                Err(CacheError::Loader(e.to_string()))
            }
        }
    }

    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let req = Request {
            group: self.name.clone(),
            key: key.to_string(),
        };
        let res = peer.get(&req).await?;

        GroupStats::incr(&self.stats.peer_loads);
        tracing::debug!("[{}] fetched key {} from peer {}", self.name, key, peer.peer());

        Ok(ByteView::from(res.value))
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("has_peers", &self.peers.get().is_some())
            .finish()
    }
}
