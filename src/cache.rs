//! Bounded, insertion-ordered cache of loaded mapping containers.
//!
//! The cache is the one resource mutated from multiple concurrent producers:
//! data sources call [`MappingCache::add`] as they finish building snapshots,
//! outside of and concurrently with scheduler ticks, while the scheduler calls
//! [`MappingCache::clear`] at the start of every refresh cycle. Mutations are
//! serialized behind a mutex; reads hand out a cloned snapshot so callers never
//! observe a torn list.
//!
//! Eviction is strict insertion order (FIFO): when an add pushes the cache over
//! its configured capacity, the oldest entries are dropped from the head until
//! the cache fits again. Access frequency never factors in - a container that is
//! read constantly is evicted just as readily as one that was never touched.
//! Entries are never mutated in place; replacing a snapshot means the old entry
//! aging out and a fresh [`MappingCache::add`].

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::mapping::MappingContainer;

/// Hook for a best-effort memory reclaim after bulk releases.
///
/// Evicting or clearing containers drops the last references to trees of
/// thousands of small allocations. On runtimes with a collector this is where a
/// GC hint would go; here deallocation already happened when the `Arc`s dropped,
/// so the hook only records that the release point was reached.
pub(crate) fn reclaim_hint() {
    tracing::trace!("memory reclaim hint (no-op on this target)");
}

/// A process-wide bounded FIFO cache of loaded mapping containers.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use mapdex::cache::MappingCache;
/// use mapdex::mapping::MappingContainer;
///
/// let cache = MappingCache::new(2);
/// cache.add(Arc::new(MappingContainer::new("1.18.2", "Yarn")));
/// cache.add(Arc::new(MappingContainer::new("1.19", "Yarn")));
/// let evicted = cache.add(Arc::new(MappingContainer::new("22w11a", "Mojang")));
///
/// assert_eq!(evicted, 1);
/// assert_eq!(cache.len(), 2);
/// assert_eq!(&*cache.snapshot()[0].version, "1.19");
/// ```
#[derive(Debug)]
pub struct MappingCache {
    /// Configured maximum number of cached containers
    max_entries: usize,
    /// Loaded containers, oldest first
    entries: Mutex<VecDeque<Arc<MappingContainer>>>,
}

impl MappingCache {
    /// Creates an empty cache bounded to `max_entries` containers.
    ///
    /// # Panics
    /// Panics if `max_entries` is zero - a cache that can hold nothing cannot
    /// satisfy its own add contract.
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        assert!(max_entries >= 1, "MappingCache capacity must be at least 1");

        MappingCache {
            max_entries,
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// The configured maximum number of cached containers.
    #[must_use]
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Appends a container at the tail, evicting from the head until the cache
    /// is back within its bound.
    ///
    /// Returns the number of containers evicted by this call.
    pub fn add(&self, container: Arc<MappingContainer>) -> usize {
        let (evicted, loaded) = {
            let mut entries = lock!(self.entries);
            entries.push_back(container);

            let mut evicted = Vec::new();
            while entries.len() > self.max_entries {
                if let Some(oldest) = entries.pop_front() {
                    evicted.push(oldest.label());
                }
            }

            let loaded: Vec<String> = entries.iter().map(|entry| entry.label()).collect();
            (evicted, loaded)
        };

        if !evicted.is_empty() {
            tracing::debug!(
                count = evicted.len(),
                removed = evicted.join(", "),
                "evicted oldest mapping container(s)"
            );
            reclaim_hint();
        }
        tracing::debug!(
            count = loaded.len(),
            loaded = loaded.join(", "),
            "currently loaded mapping container(s)"
        );

        evicted.len()
    }

    /// Removes all entries unconditionally.
    ///
    /// Called by the refresh scheduler at the start of every cycle, and safe to
    /// call concurrently with [`Self::add`].
    pub fn clear(&self) {
        let dropped = {
            let mut entries = lock!(self.entries);
            let dropped = entries.len();
            entries.clear();
            dropped
        };
        if dropped > 0 {
            tracing::debug!(count = dropped, "cleared mapping container cache");
        }
    }

    /// Number of containers currently cached.
    #[must_use]
    pub fn len(&self) -> usize {
        lock!(self.entries).len()
    }

    /// Returns `true` if the cache holds no containers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock!(self.entries).is_empty()
    }

    /// A consistent copy of the cached containers, oldest first.
    ///
    /// The clone is taken under the lock, so the returned list is never torn by
    /// a concurrent `add` or `clear`; the `Arc`s keep the containers alive even
    /// if they are evicted right after.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<MappingContainer>> {
        lock!(self.entries).iter().cloned().collect()
    }

    /// Finds a cached container by project name and version label.
    #[must_use]
    pub fn find(&self, name: &str, version: &str) -> Option<Arc<MappingContainer>> {
        lock!(self.entries)
            .iter()
            .find(|entry| &*entry.name == name && &*entry.version == version)
            .cloned()
    }
}
