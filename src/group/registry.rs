//! Group Registry
//!
//! Name-to-group lookup shared by everything in one process. A registry starts
//! empty; groups are added at startup and live as long as the registry. The
//! peer server is handed the registry explicitly rather than reaching for a global.

use super::group::Group;
use crate::error::{CacheError, Result};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::future::Future;
use std::sync::Arc;

pub struct GroupRegistry {
    groups: DashMap<String, Arc<Group>>,
}

impl GroupRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers an already configured group.
    ///
    /// # Returns
    /// * `Err(CacheError::DuplicateGroup)` if the name is taken. The existing group is kept.
    pub fn register(&self, group: Group) -> Result<Arc<Group>> {
        match self.groups.entry(group.name().to_string()) {
            Entry::Occupied(entry) => Err(CacheError::DuplicateGroup(entry.key().clone())),
            Entry::Vacant(entry) => {
                let group = Arc::new(group);
                entry.insert(group.clone());
                tracing::info!("Registered cache group: {}", group.name());
                Ok(group)
            }
        }
    }

    /// Builds a group with default settings and registers it.
    pub fn new_group<F, Fut>(&self, name: &str, cache_bytes: usize, loader: F) -> Result<Arc<Group>>
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Vec<u8>>> + Send + 'static,
    {
        self.register(Group::new(name, cache_bytes, loader))
    }

    pub fn get(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.get(name).map(|entry| entry.value().clone())
    }

    /// Returns the names of all registered groups.
    pub fn names(&self) -> Vec<String> {
        self.groups.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self {
            groups: DashMap::new(),
        }
    }
}
