//! Configuration for a mapping context.
//!
//! Every tunable the core consumes is an explicit value handed to
//! [`crate::context::MappingContext::new`] at construction time - there is no
//! ambient or lazily-initialized global configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::namespace::Namespace;

/// Configuration consumed by the core components.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use mapdex::config::MapdexConfig;
///
/// let config = MapdexConfig::default()
///     .with_max_cached_containers(5)
///     .with_refresh_interval(Duration::from_secs(600));
/// assert_eq!(config.max_cached_containers, 5);
/// ```
#[derive(Clone)]
pub struct MapdexConfig {
    /// Upper bound on the number of containers the cache holds (>= 1).
    pub max_cached_containers: usize,
    /// Period of the background refresh cycle.
    pub refresh_interval: Duration,
    /// Deadline for a single namespace refresh within one cycle. A refresh that
    /// exceeds it is failed and logged, without blocking sibling refreshes.
    pub refresh_timeout: Duration,
    /// Namespaces to register at context construction.
    pub namespaces: Vec<Arc<dyn Namespace>>,
}

impl Default for MapdexConfig {
    fn default() -> Self {
        MapdexConfig {
            max_cached_containers: 3,
            refresh_interval: Duration::from_secs(30 * 60),
            refresh_timeout: Duration::from_secs(5 * 60),
            namespaces: Vec::new(),
        }
    }
}

impl fmt::Debug for MapdexConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapdexConfig")
            .field("max_cached_containers", &self.max_cached_containers)
            .field("refresh_interval", &self.refresh_interval)
            .field("refresh_timeout", &self.refresh_timeout)
            .field(
                "namespaces",
                &self
                    .namespaces
                    .iter()
                    .map(|namespace| namespace.id().to_owned())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl MapdexConfig {
    /// Sets the cache capacity.
    #[must_use]
    pub fn with_max_cached_containers(mut self, max: usize) -> Self {
        self.max_cached_containers = max;
        self
    }

    /// Sets the refresh cycle period.
    #[must_use]
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Sets the per-namespace refresh deadline.
    #[must_use]
    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    /// Adds a namespace to register at construction.
    #[must_use]
    pub fn with_namespace(mut self, namespace: Arc<dyn Namespace>) -> Self {
        self.namespaces.push(namespace);
        self
    }
}
