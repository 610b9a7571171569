//! Explicit wiring of the core components.
//!
//! [`MappingContext`] replaces the usual process-wide singletons with one value
//! constructed from a [`crate::config::MapdexConfig`] and passed by reference to
//! every collaborator: the container cache, the namespace registry, and the
//! refresh scheduler all hang off it. Shutdown is equally explicit - the
//! scheduler hands back a [`crate::scheduler::SchedulerHandle`] whose
//! `shutdown` waits for the in-flight cycle instead of abandoning it.

use std::sync::Arc;

use crate::cache::MappingCache;
use crate::config::MapdexConfig;
use crate::namespace::NamespaceRegistry;

/// The assembled core: configuration, container cache, and namespace registry.
///
/// Construction registers every namespace from the configuration (including one
/// level of declared dependencies) and sizes the cache; after that the registry
/// is treated as read-only.
///
/// # Examples
///
/// ```rust,no_run
/// use mapdex::config::MapdexConfig;
/// use mapdex::context::MappingContext;
/// use mapdex::scheduler::RefreshScheduler;
///
/// # async fn run() {
/// let ctx = MappingContext::new(MapdexConfig::default());
/// let scheduler = RefreshScheduler::spawn(ctx.clone());
///
/// // ... serve lookups from ctx.cache() ...
///
/// scheduler.shutdown().await;
/// # }
/// ```
pub struct MappingContext {
    config: MapdexConfig,
    cache: MappingCache,
    registry: NamespaceRegistry,
}

impl MappingContext {
    /// Builds a context from explicit configuration.
    ///
    /// # Panics
    /// Panics if `config.max_cached_containers` is zero (see
    /// [`MappingCache::new`]).
    #[must_use]
    pub fn new(config: MapdexConfig) -> Arc<Self> {
        let cache = MappingCache::new(config.max_cached_containers);
        let registry = NamespaceRegistry::new();
        for namespace in &config.namespaces {
            registry.register(namespace.clone());
        }
        tracing::info!(
            namespaces = registry.len(),
            max_cached = config.max_cached_containers,
            "mapping context initialized"
        );

        Arc::new(MappingContext {
            config,
            cache,
            registry,
        })
    }

    /// The configuration this context was built from.
    #[must_use]
    pub fn config(&self) -> &MapdexConfig {
        &self.config
    }

    /// The bounded container cache.
    #[must_use]
    pub fn cache(&self) -> &MappingCache {
        &self.cache
    }

    /// The namespace registry.
    #[must_use]
    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::Namespace;
    use crate::Result;
    use async_trait::async_trait;

    struct StubNamespace(&'static str);

    #[async_trait]
    impl Namespace for StubNamespace {
        fn id(&self) -> &str {
            self.0
        }

        async fn refresh(&self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn construction_registers_configured_namespaces() {
        let config = MapdexConfig::default()
            .with_namespace(Arc::new(StubNamespace("yarn")))
            .with_namespace(Arc::new(StubNamespace("mojang")));
        let ctx = MappingContext::new(config);

        assert_eq!(ctx.registry().len(), 2);
        assert!(ctx.registry().get("yarn").is_ok());
        assert!(ctx.cache().is_empty());
    }

    #[test]
    fn cache_capacity_comes_from_config() {
        let ctx = MappingContext::new(MapdexConfig::default().with_max_cached_containers(7));
        assert_eq!(ctx.cache().max_entries(), 7);
    }
}
