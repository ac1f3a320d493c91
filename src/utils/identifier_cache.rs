use moka::future::Cache;
use std::time::Duration;

/// Recently seen registered identifiers.
/// A hit means TAKEN; a miss says nothing.
#[derive(Clone)]
pub struct IdentifierCache {
    inner: Cache<String, bool>,
}

impl Default for IdentifierCache {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierCache {
    pub fn new() -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(500_000) // tune based on memory
                .time_to_live(Duration::from_secs(86400)) // 24h TTL
                .build(),
        }
    }

    pub async fn mark_taken(&self, id: &str) {
        self.inner.insert(id.to_string(), true).await;
    }

    pub async fn is_taken(&self, id: &str) -> bool {
        self.inner.get(id).await.unwrap_or(false)
    }

    /// Batch mark identifiers as taken
    pub async fn batch_mark(&self, ids: &[String]) {
        let futures: Vec<_> = ids
            .iter()
            .map(|id| self.inner.insert(id.clone(), true))
            .collect();

        // Await all insertions concurrently
        futures::future::join_all(futures).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn marks_are_visible() {
        let cache = IdentifierCache::new();
        assert!(!cache.is_taken("E1").await);
        cache.mark_taken("E1").await;
        cache.batch_mark(&["E2".to_string()]).await;
        assert!(cache.is_taken("E1").await);
        assert!(cache.is_taken("E2").await);
        assert!(!cache.is_taken("e1").await);
    }
}
