//! HTTP Peer Pool
//!
//! The `PeerPicker` for the HTTP transport. Holds the hash ring and one
//! `HttpGetter` per peer behind a single lock so the two always change together.

use super::client::HttpGetter;
use super::handlers;
use super::protocol::{DEFAULT_BASE_PATH, normalize_base_path};
use crate::consistenthash::{HashFn, Ring, ring::DEFAULT_REPLICAS};
use crate::group::{GroupRegistry, PeerGetter, PeerPicker};

use axum::Router;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
const DEFAULT_ATTEMPTS: usize = 2;

/// Tunables for an `HttpPool`.
#[derive(Clone)]
pub struct PoolOptions {
    /// Path prefix for peer requests.
    pub base_path: String,
    /// Virtual positions per peer on the ring.
    pub replicas: usize,
    /// Ring hash. `None` selects CRC-32.
    pub hash: Option<HashFn>,
    /// Deadline for a single peer request.
    pub timeout: Duration,
    /// Tries per peer request on transport failure.
    pub attempts: usize,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            hash: None,
            timeout: DEFAULT_TIMEOUT,
            attempts: DEFAULT_ATTEMPTS,
        }
    }
}

impl std::fmt::Debug for PoolOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolOptions")
            .field("base_path", &self.base_path)
            .field("replicas", &self.replicas)
            .field("custom_hash", &self.hash.is_some())
            .field("timeout", &self.timeout)
            .field("attempts", &self.attempts)
            .finish()
    }
}

struct PeerSet {
    ring: Ring,
    getters: HashMap<String, Arc<HttpGetter>>,
}

pub struct HttpPool {
    /// This node's own address, e.g. `http://10.0.0.1:8001`.
    self_addr: String,
    opts: PoolOptions,
    client: reqwest::Client,
    peers: RwLock<PeerSet>,
}

impl HttpPool {
    pub fn new(self_addr: &str) -> Arc<Self> {
        Self::with_options(self_addr, PoolOptions::default())
    }

    pub fn with_options(self_addr: &str, mut opts: PoolOptions) -> Arc<Self> {
        opts.base_path = normalize_base_path(&opts.base_path);
        let ring = Ring::new(opts.replicas, opts.hash.clone());

        Arc::new(Self {
            self_addr: self_addr.trim_end_matches('/').to_string(),
            opts,
            client: reqwest::Client::new(),
            peers: RwLock::new(PeerSet {
                ring,
                getters: HashMap::new(),
            }),
        })
    }

    /// Replaces the peer set. Include this node's own address so it owns its share of keys.
    ///
    /// The new ring and clients are built before the lock is taken; lookups are
    /// only blocked for the swap.
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let peers: Vec<String> = peers
            .into_iter()
            .map(|peer| peer.as_ref().trim_end_matches('/').to_string())
            .collect();

        let mut ring = Ring::new(self.opts.replicas, self.opts.hash.clone());
        ring.set_peers(&peers);

        let getters = peers
            .iter()
            .map(|peer| {
                let getter = HttpGetter::new(
                    peer,
                    &self.opts.base_path,
                    self.client.clone(),
                    self.opts.timeout,
                    self.opts.attempts,
                );
                (peer.clone(), Arc::new(getter))
            })
            .collect();

        *self.peers.write() = PeerSet { ring, getters };

        tracing::info!("[Server {}] peer set updated: {:?}", self.self_addr, peers);
    }

    /// Addresses currently on the ring.
    pub fn peers(&self) -> Vec<String> {
        let mut peers: Vec<String> = self.peers.read().getters.keys().cloned().collect();
        peers.sort();
        peers
    }

    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    pub fn options(&self) -> &PoolOptions {
        &self.opts
    }

    /// Router answering peer lookups for the groups in `registry`.
    pub fn router(&self, registry: Arc<GroupRegistry>) -> Router {
        handlers::router(registry, &self.opts.base_path)
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let peers = self.peers.read();
        let owner = peers.ring.get(key)?;
        if owner == self.self_addr {
            return None;
        }

        tracing::debug!("[Server {}] pick peer {} for key {}", self.self_addr, owner, key);
        peers
            .getters
            .get(owner)
            .map(|getter| getter.clone() as Arc<dyn PeerGetter>)
    }
}
