//! Session-local string interning for snapshot decoding.
//!
//! Mapping snapshots repeat identifier content at a very high rate - common
//! package prefixes alone appear thousands of times - so decoding a container
//! naively would allocate each repeated string again. [`StringPool`] collapses
//! that duplication by handing out one canonical `Arc<str>` per distinct content.
//!
//! A pool lives for exactly one decode session: [`crate::codec::decode`] creates
//! it fresh and drops it with the reader, so canonical instances are never shared
//! between the trees of two independent decode calls.

use std::collections::HashSet;
use std::sync::Arc;

/// A per-decode-session deduplication table mapping string content to one
/// canonical `Arc<str>` instance.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use mapdex::codec::StringPool;
///
/// let mut pool = StringPool::new();
/// let a = pool.intern("net/minecraft");
/// let b = pool.intern("net/minecraft");
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
#[derive(Debug, Default)]
pub struct StringPool {
    entries: HashSet<Arc<str>>,
}

impl StringPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        StringPool::default()
    }

    /// Returns the canonical instance for `content`, allocating one if this is
    /// the first time the content is seen.
    pub fn intern(&mut self, content: &str) -> Arc<str> {
        if let Some(existing) = self.entries.get(content) {
            return existing.clone();
        }
        let canonical: Arc<str> = Arc::from(content);
        self.entries.insert(canonical.clone());
        canonical
    }

    /// Number of distinct strings interned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_dedupes_identical_content() {
        let mut pool = StringPool::new();
        let a = pool.intern("class_2338");
        let b = pool.intern("class_2338");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn intern_distinct_content() {
        let mut pool = StringPool::new();
        let a = pool.intern("method_1551");
        let b = pool.intern("field_1724");
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn separate_pools_do_not_share() {
        let mut first = StringPool::new();
        let mut second = StringPool::new();
        let a = first.intern("net/minecraft/class_310");
        let b = second.intern("net/minecraft/class_310");
        assert_eq!(a, b);
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
