//! Atomically replaced attribute snapshot.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Storage-confirmed attribute codes for one requested field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSnapshot {
    digest: String,
    attributes: Vec<String>,
}

impl AttributeSnapshot {
    /// Creates a snapshot for the field list hashed to `digest`.
    #[must_use]
    pub fn new(digest: impl Into<String>, attributes: Vec<String>) -> Self {
        Self {
            digest: digest.into(),
            attributes,
        }
    }

    /// Digest of the field list this snapshot was computed for.
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// The confirmed attribute codes.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Returns true if this snapshot was computed for `digest`.
    #[must_use]
    pub fn matches(&self, digest: &str) -> bool {
        self.digest == digest
    }
}

/// Hit and miss counters of a [`SnapshotCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered by the current snapshot.
    pub hits: u64,
    /// Lookups that found no snapshot or a stale one.
    pub misses: u64,
}

/// Holds at most one [`AttributeSnapshot`].
#[derive(Debug, Default)]
pub struct SnapshotCache {
    current: RwLock<Option<Arc<AttributeSnapshot>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SnapshotCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot if it was computed for `digest`.
    pub fn lookup(&self, digest: &str) -> Option<Arc<AttributeSnapshot>> {
        let current = self.current.read().clone();
        match current {
            Some(snapshot) if snapshot.matches(digest) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Attribute snapshot hit for digest '{}'", digest);
                Some(snapshot)
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Attribute snapshot miss for digest '{}'", digest);
                None
            }
        }
    }

    /// Replaces the current snapshot and returns the stored value.
    pub fn store(&self, snapshot: AttributeSnapshot) -> Arc<AttributeSnapshot> {
        let snapshot = Arc::new(snapshot);
        *self.current.write() = Some(Arc::clone(&snapshot));
        debug!(
            attributes = snapshot.attributes().len(),
            "Stored attribute snapshot for digest '{}'",
            snapshot.digest()
        );
        snapshot
    }

    /// Returns the current snapshot regardless of digest.
    #[must_use]
    pub fn current(&self) -> Option<Arc<AttributeSnapshot>> {
        self.current.read().clone()
    }

    /// Drops the current snapshot.
    pub fn clear(&self) {
        *self.current.write() = None;
    }

    /// Returns the hit/miss counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(digest: &str, attributes: &[&str]) -> AttributeSnapshot {
        AttributeSnapshot::new(digest, attributes.iter().map(|a| (*a).to_string()).collect())
    }

    #[test]
    fn test_empty_cache_misses() {
        let cache = SnapshotCache::new();
        assert!(cache.lookup("abc").is_none());
        assert!(cache.current().is_none());
        assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 1 });
    }

    #[test]
    fn test_store_then_hit() {
        let cache = SnapshotCache::new();
        cache.store(snapshot("abc", &["color"]));

        let found = cache.lookup("abc").unwrap();
        assert_eq!(found.attributes(), ["color".to_string()]);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 0 });
    }

    #[test]
    fn test_other_digest_misses() {
        let cache = SnapshotCache::new();
        cache.store(snapshot("abc", &["color"]));

        assert!(cache.lookup("def").is_none());
        // The stale snapshot stays until replaced.
        assert_eq!(cache.current().unwrap().digest(), "abc");
    }

    #[test]
    fn test_store_replaces_whole_snapshot() {
        let cache = SnapshotCache::new();
        cache.store(snapshot("abc", &["color"]));
        cache.store(snapshot("def", &["size"]));

        let current = cache.current().unwrap();
        assert_eq!(current.digest(), "def");
        assert_eq!(current.attributes(), ["size".to_string()]);
        assert!(cache.lookup("abc").is_none());
    }

    #[test]
    fn test_clear() {
        let cache = SnapshotCache::new();
        cache.store(snapshot("abc", &[]));
        cache.clear();
        assert!(cache.lookup("abc").is_none());
    }

    #[test]
    fn test_snapshot_accessors() {
        let snap = snapshot("abc", &["sku", "size"]);
        assert_eq!(snap.digest(), "abc");
        assert!(snap.matches("abc"));
        assert!(!snap.matches("abd"));
        assert_eq!(snap.attributes().len(), 2);
    }
}
