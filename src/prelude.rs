//! # mapdex Prelude
//!
//! This module provides a convenient prelude for the most commonly used types
//! and traits from the mapdex library. Import this module to get quick access
//! to the essential types for serving and refreshing mapping data.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all mapdex operations
pub use crate::Error;

/// The result type used throughout mapdex
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Explicit construction-time wiring of cache, registry and configuration
pub use crate::context::MappingContext;

/// Configuration consumed by the core components
pub use crate::config::MapdexConfig;

/// The periodic background refresh driver and its handle
pub use crate::scheduler::{RefreshScheduler, SchedulerHandle};

// ================================================================================================
// Data Model
// ================================================================================================

/// Snapshot data model types
pub use crate::mapping::{
    MappingClass, MappingContainer, MappingField, MappingMethod, MappingSource, Obf,
};

// ================================================================================================
// Codec and Cache
// ================================================================================================

/// Binary snapshot serialization
pub use crate::codec;

/// The bounded FIFO container cache
pub use crate::cache::MappingCache;

/// The data-source trait and registry
pub use crate::namespace::{Namespace, NamespaceRegistry};
