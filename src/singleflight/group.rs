use crate::error::Result;

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::watch;

/// Shared result slot of one in-flight call. `None` until the leader publishes.
type Slot<T> = watch::Receiver<Option<Result<T>>>;

enum Registration<T> {
    Leader(watch::Sender<Option<Result<T>>>, Slot<T>),
    Waiter(Slot<T>),
}

/// Table of in-flight calls keyed by cache key.
pub struct CallGroup<T> {
    calls: Mutex<HashMap<String, Slot<T>>>,
}

impl<T: Clone> CallGroup<T> {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `work` for `key` unless a call for `key` is already in flight, in
    /// which case the caller waits for that call and gets its exact result.
    pub async fn run<F, Fut>(&self, key: &str, work: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        loop {
            let mut slot = match self.register(key) {
                Registration::Leader(tx, own) => return self.lead(key, tx, own, work).await,
                Registration::Waiter(slot) => slot,
            };

            tracing::trace!("Joining in-flight call for key {}", key);

            if let Ok(published) = slot.wait_for(Option::is_some).await
                && let Some(result) = &*published
            {
                return result.clone();
            }

            // Leader went away without publishing; its record is gone, so race again.
            tracing::debug!("In-flight call for key {} was abandoned, retrying", key);
        }
    }

    /// Joins the in-flight call for `key`, or registers a new one.
    fn register(&self, key: &str) -> Registration<T> {
        let mut calls = self.calls.lock();
        // A closed slot belongs to a leader that was dropped mid-call.
        if let Some(slot) = calls.get(key)
            && slot.has_changed().is_ok()
        {
            return Registration::Waiter(slot.clone());
        }
        let (tx, rx) = watch::channel(None);
        calls.insert(key.to_string(), rx.clone());
        Registration::Leader(tx, rx)
    }

    async fn lead<F, Fut>(
        &self,
        key: &str,
        tx: watch::Sender<Option<Result<T>>>,
        own: Slot<T>,
        work: F,
    ) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let _release = Release {
            group: self,
            key,
            own,
        };

        let result = work().await;
        tx.send_replace(Some(result.clone()));
        result
    }

    /// Number of calls currently in flight.
    pub fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }
}

impl<T: Clone> Default for CallGroup<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Removes the in-flight record when the leader finishes or is dropped.
struct Release<'a, T> {
    group: &'a CallGroup<T>,
    key: &'a str,
    own: Slot<T>,
}

impl<T> Drop for Release<'_, T> {
    fn drop(&mut self) {
        let mut calls = self.group.calls.lock();
        // Only our own record; a successor may already hold the key.
        if calls.get(self.key).is_some_and(|slot| slot.same_channel(&self.own)) {
            calls.remove(self.key);
        }
    }
}
