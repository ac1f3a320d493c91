use autoscale_cuckoo_filter::CuckooFilter;
use std::sync::RwLock;

/// Expected capacity and false-positive rate.
/// Tune these based on real headcount.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

/// Probabilistic set of registered identifiers.
///
/// `false` from [`IdentifierFilter::might_exist`] is authoritative once the
/// filter has been warmed from the store; `true` may be a false positive.
pub struct IdentifierFilter {
    inner: RwLock<CuckooFilter<str>>,
}

impl Default for IdentifierFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierFilter {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)),
        }
    }

    /// Check if an identifier might exist (false positives possible)
    pub fn might_exist(&self, id: &str) -> bool {
        // a poisoned lock only means a writer panicked mid-add; reads stay usable
        let filter = self.inner.read().unwrap_or_else(|e| e.into_inner());
        filter.contains(id)
    }

    pub fn insert(&self, id: &str) {
        let mut filter = self.inner.write().unwrap_or_else(|e| e.into_inner());
        filter.add(id);
    }

    /// Insert a batch under a single write lock
    pub fn insert_batch(&self, ids: &[String]) {
        let mut filter = self.inner.write().unwrap_or_else(|e| e.into_inner());
        for id in ids {
            filter.add(id.as_str());
        }
    }
}
