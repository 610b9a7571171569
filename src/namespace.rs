//! Mapping data sources and the registry that holds them.
//!
//! A namespace is one independent data provider - one mapping project's release
//! channel. The core knows nothing about how a namespace fetches or parses its
//! data; it only relies on the [`Namespace`] trait: a stable identifier, an
//! optional set of other namespaces it depends on, and an asynchronous refresh
//! of the namespace's own metadata. Namespaces hand finished containers to the
//! [`crate::cache::MappingCache`] themselves as a side effect of their fetch
//! pipeline.
//!
//! The [`NamespaceRegistry`] is populated once at startup and treated as
//! read-only afterwards by the scheduler and by lookups; registering namespaces
//! while ticks are running is not a supported scenario.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::{Error, Result};

/// An independent data source supplying mapping containers for one project.
///
/// Implementations own their fetch and parse pipeline entirely. `refresh` is
/// invoked by the scheduler once per cycle and should reload whatever source
/// metadata the namespace keeps (version manifests, release listings); it does
/// not have to eagerly rebuild every container.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use mapdex::namespace::Namespace;
/// use mapdex::Result;
///
/// struct YarnNamespace;
///
/// #[async_trait]
/// impl Namespace for YarnNamespace {
///     fn id(&self) -> &str {
///         "yarn"
///     }
///
///     async fn refresh(&self) -> Result<()> {
///         // fetch the version manifest, update internal state
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Namespace: Send + Sync {
    /// Stable identifier of this namespace, unique across the registry.
    fn id(&self) -> &str;

    /// Other namespaces this one directly depends on.
    ///
    /// Queried once at registration time; the returned handles are registered
    /// alongside this namespace. Only this one level is pulled in - a
    /// dependency's own dependencies are not walked (see
    /// [`NamespaceRegistry::register`]).
    fn dependencies(&self) -> Vec<Arc<dyn Namespace>> {
        Vec::new()
    }

    /// Reloads this namespace's own source metadata.
    ///
    /// # Errors
    /// May fail for any source-specific reason (network, parse). Failures are
    /// isolated by the scheduler: they are recorded and the namespace stays
    /// stale until the next cycle, without affecting sibling refreshes.
    async fn refresh(&self) -> Result<()>;
}

/// A mapping from namespace identifier to namespace handle.
///
/// Backed by a concurrent map so lookups from request handlers never contend
/// with the scheduler iterating the registry.
#[derive(Default)]
pub struct NamespaceRegistry {
    namespaces: DashMap<String, Arc<dyn Namespace>>,
}

impl NamespaceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        NamespaceRegistry::default()
    }

    /// Registers a namespace and, one level deep, its declared dependencies.
    ///
    /// Re-registering an identifier overwrites the prior handle. Dependencies
    /// of dependencies are intentionally not walked; a namespace whose
    /// dependency graph is deeper than one level must register the transitive
    /// members itself.
    pub fn register(&self, namespace: Arc<dyn Namespace>) {
        for dependency in namespace.dependencies() {
            tracing::debug!(
                namespace = namespace.id(),
                dependency = dependency.id(),
                "registering namespace dependency"
            );
            self.namespaces
                .insert(dependency.id().to_owned(), dependency);
        }
        self.namespaces
            .insert(namespace.id().to_owned(), namespace);
    }

    /// Looks up a namespace by identifier.
    ///
    /// # Errors
    /// Returns [`crate::Error::NamespaceNotFound`] if the identifier was never
    /// registered - callers must register before lookup.
    pub fn get(&self, id: &str) -> Result<Arc<dyn Namespace>> {
        self.namespaces
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::NamespaceNotFound(id.to_owned()))
    }

    /// All registered identifiers, in no particular order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.namespaces
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// All registered namespace handles, in no particular order.
    #[must_use]
    pub fn handles(&self) -> Vec<Arc<dyn Namespace>> {
        self.namespaces
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of registered namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    /// Returns `true` if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}
