#![doc(html_no_source)]
#![deny(missing_docs)]

//! # mapdex
//!
//! An in-process index for symbol-mapping data. `mapdex` serves the rename
//! history of program elements - obfuscated, intermediary and human-mapped
//! names for classes, methods and fields - supplied by multiple independent
//! data sources ("namespaces"), and keeps lookups cheap with a bounded cache
//! that a background scheduler refreshes on a fixed cycle.
//!
//! ## Features
//!
//! - **Compact snapshot codec** - a bit-exact binary format for whole mapping
//!   containers, with single-byte tags for names that match their intermediary
//!   original and per-decode string interning to tame identifier duplication
//! - **Bounded container cache** - insertion-ordered FIFO eviction under a
//!   configured capacity, safe for concurrent producers and readers
//! - **Background refresh** - a periodic fan-out/join cycle over all registered
//!   namespaces, with per-source deadlines and failure isolation
//! - **No ambient state** - one explicit [`context::MappingContext`] wires the
//!   pieces together; shutdown is a method call, not a process kill
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mapdex::prelude::*;
//!
//! # async fn run() -> mapdex::Result<()> {
//! let ctx = MappingContext::new(MapdexConfig::default());
//! let scheduler = RefreshScheduler::spawn(ctx.clone());
//!
//! // Data sources hand finished snapshots to the cache...
//! # let container = MappingContainer::new("1.18.2", "Yarn");
//! ctx.cache().add(std::sync::Arc::new(container));
//!
//! // ...and anyone can persist one without re-fetching.
//! let snapshot = ctx.cache().snapshot();
//! if let Some(container) = snapshot.first() {
//!     let bytes = codec::encode(container.as_ref())?;
//!     let restored = codec::decode(&bytes)?;
//!     assert_eq!(&restored, &**container);
//! }
//!
//! scheduler.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`mapping`] - the snapshot data model (containers, classes, members, [`mapping::Obf`])
//! - [`codec`] - binary serialization of snapshots, string pool included
//! - [`cache`] - the bounded FIFO container cache
//! - [`namespace`] - the data-source trait and registry
//! - [`scheduler`] - the periodic refresh driver
//! - [`config`] / [`context`] - explicit construction-time wiring
//!
//! The wire format has no version header: producer and consumer must agree on
//! the layout, and format changes are breaking. Containers do not persist
//! across process restarts and the cache is not shared between processes.

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

pub mod cache;
pub mod codec;
pub mod config;
pub mod context;
pub mod mapping;
pub mod namespace;
pub mod scheduler;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use mapdex::prelude::*;
///
/// let ctx = MappingContext::new(MapdexConfig::default());
/// assert!(ctx.cache().is_empty());
/// ```
pub mod prelude;

/// The result type used throughout mapdex.
pub type Result<T> = std::result::Result<T, Error>;

pub use error::Error;
