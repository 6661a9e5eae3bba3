use crate::models::Category;
use crate::services::expansion::{Expander, ExpansionError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// In-memory cache in front of an expander
///
/// Only successful results are stored, so a failed call is retried on the
/// next request for the same bucket.
pub struct CachedExpander {
    inner: Arc<dyn Expander>,
    cache: moka::future::Cache<String, Vec<String>>,
}

impl CachedExpander {
    pub fn new(inner: Arc<dyn Expander>, capacity: u64, ttl: Duration) -> Self {
        let cache = moka::future::CacheBuilder::new(capacity)
            .time_to_live(ttl)
            .build();

        Self { inner, cache }
    }

    /// Cache key: category label plus the ordered keywords
    pub fn key(category: Category, keywords: &[String]) -> String {
        format!("{}:{}", category.label(), keywords.join("\u{1f}"))
    }
}

#[async_trait]
impl Expander for CachedExpander {
    async fn expand(&self, category: Category, keywords: &[String]) -> Result<Vec<String>, ExpansionError> {
        let key = Self::key(category, keywords);

        if let Some(hit) = self.cache.get(&key).await {
            tracing::trace!("expansion cache hit: {}", key);
            return Ok(hit);
        }

        let suggestions = self.inner.expand(category, keywords).await?;
        self.cache.insert(key, suggestions.clone()).await;
        Ok(suggestions)
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    fn is_enabled(&self) -> bool {
        self.inner.is_enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingExpander {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Expander for CountingExpander {
        async fn expand(&self, _category: Category, _keywords: &[String]) -> Result<Vec<String>, ExpansionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ExpansionError::InvalidResponse("nope".into()))
            } else {
                Ok(vec!["Semiconductors".to_string()])
            }
        }

        fn model_id(&self) -> &str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache() {
        let inner = Arc::new(CountingExpander { calls: AtomicUsize::new(0), fail: false });
        let cached = CachedExpander::new(inner.clone(), 100, Duration::from_secs(60));
        let keywords = vec!["AI".to_string()];

        let first = cached.expand(Category::Technology, &keywords).await.unwrap();
        let second = cached.expand(Category::Technology, &keywords).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cached.model_id(), "counting");
    }

    #[tokio::test]
    async fn test_failures_not_cached() {
        let inner = Arc::new(CountingExpander { calls: AtomicUsize::new(0), fail: true });
        let cached = CachedExpander::new(inner.clone(), 100, Duration::from_secs(60));
        let keywords = vec!["AI".to_string()];

        assert!(cached.expand(Category::Technology, &keywords).await.is_err());
        assert!(cached.expand(Category::Technology, &keywords).await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_key_depends_on_category_and_order() {
        let a = CachedExpander::key(Category::Finance, &["A".into(), "B".into()]);
        let b = CachedExpander::key(Category::Finance, &["B".into(), "A".into()]);
        let c = CachedExpander::key(Category::Technology, &["A".into(), "B".into()]);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
