use crate::core::weighting::KeywordSet;
use crate::models::{Category, CategoryBucket, KeywordSource};
use crate::services::{Expander, ExpansionError};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Timeouts and limits for expansion calls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpansionPolicy {
    /// Timeout for a single call
    pub call_timeout: Duration,
    /// Budget for all calls of one request
    pub deadline: Duration,
    /// Extra attempts after a failed call (at most 1 is honoured)
    pub retries: u8,
    /// Suggestions kept per category
    pub max_suggestions: usize,
}

impl ExpansionPolicy {
    pub fn new(call_timeout: Duration, retries: u8, max_suggestions: usize) -> Self {
        Self {
            call_timeout,
            deadline: call_timeout * 2,
            retries: retries.min(1),
            max_suggestions,
        }
    }
}

impl Default for ExpansionPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(90), 0, 3)
    }
}

/// Suggestions returned for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySuggestions {
    pub category: Category,
    pub suggestions: Vec<String>,
}

/// Ask the expander about every nonempty bucket, concurrently
///
/// Failed, timed-out or panicked calls contribute nothing. Calls still
/// running at the policy deadline are aborted. Results come back in bucket
/// order regardless of completion order.
pub async fn collect_suggestions(
    expander: Arc<dyn Expander>,
    buckets: Vec<CategoryBucket>,
    policy: ExpansionPolicy,
) -> Vec<CategorySuggestions> {
    let buckets: Vec<CategoryBucket> = buckets.into_iter().filter(|b| !b.is_empty()).collect();
    if buckets.is_empty() || !expander.is_enabled() {
        return Vec::new();
    }

    let categories: Vec<Category> = buckets.iter().map(|b| b.category).collect();
    let mut tasks = JoinSet::new();

    for (idx, bucket) in buckets.iter().enumerate() {
        let expander = Arc::clone(&expander);
        let category = bucket.category;
        let keywords = bucket.unique_keywords();
        tasks.spawn(async move {
            let result = expand_with_retry(expander.as_ref(), category, &keywords, policy).await;
            (idx, result)
        });
    }

    let deadline = Instant::now() + policy.deadline;
    let mut results: Vec<Option<Vec<String>>> = vec![None; categories.len()];

    loop {
        match tokio::time::timeout_at(deadline, tasks.join_next()).await {
            Ok(Some(Ok((idx, Ok(suggestions))))) => results[idx] = Some(suggestions),
            Ok(Some(Ok((idx, Err(e))))) => {
                tracing::warn!(category = %categories[idx], error = %e, "expansion failed, skipping category");
            }
            Ok(Some(Err(e))) => {
                tracing::warn!(error = %e, "expansion task did not complete");
            }
            Ok(None) => break,
            Err(_) => {
                tracing::warn!(pending = tasks.len(), "expansion deadline exceeded, keeping partial results");
                tasks.abort_all();
                break;
            }
        }
    }

    categories
        .into_iter()
        .zip(results)
        .filter_map(|(category, suggestions)| {
            let mut suggestions: Vec<String> = suggestions?
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            suggestions.truncate(policy.max_suggestions);
            Some(CategorySuggestions { category, suggestions })
        })
        .collect()
}

async fn expand_with_retry(
    expander: &dyn Expander,
    category: Category,
    keywords: &[String],
    policy: ExpansionPolicy,
) -> Result<Vec<String>, ExpansionError> {
    let attempts = 1 + u32::from(policy.retries.min(1));
    let mut attempt = 0;

    loop {
        attempt += 1;
        let err = match tokio::time::timeout(policy.call_timeout, expander.expand(category, keywords)).await {
            Ok(Ok(suggestions)) => return Ok(suggestions),
            Ok(Err(e)) => e,
            Err(_) => ExpansionError::Timeout(policy.call_timeout),
        };

        if attempt >= attempts {
            return Err(err);
        }
        tracing::debug!(category = %category, error = %err, "retrying expansion");
    }
}

/// Merge suggestions into the keyword set without touching existing entries
///
/// New keywords get `weight` and a source naming `model`. When two
/// categories suggest the same keyword, the first batch wins. Returns the
/// number of keywords added.
pub fn merge_suggestions(
    keywords: &mut KeywordSet,
    batches: &[CategorySuggestions],
    weight: f64,
    model: &str,
) -> usize {
    let mut added = 0;
    for batch in batches {
        for suggestion in &batch.suggestions {
            let suggestion = suggestion.trim();
            if suggestion.is_empty() {
                continue;
            }
            if keywords.insert_if_absent(suggestion, weight, KeywordSource::ai(model)) {
                added += 1;
            }
        }
    }
    tracing::debug!(added, "merged expansion suggestions");
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedExpander;

    #[async_trait]
    impl Expander for FixedExpander {
        async fn expand(&self, category: Category, _keywords: &[String]) -> Result<Vec<String>, ExpansionError> {
            match category {
                Category::Technology => Ok(vec!["Chips".into(), " ".into(), "Cloud".into(), "5G".into(), "Edge".into()]),
                Category::Finance => Err(ExpansionError::InvalidResponse("garbage".into())),
                _ => Ok(vec!["Shared".into()]),
            }
        }

        fn model_id(&self) -> &str {
            "fixed"
        }
    }

    fn bucket(category: Category, keywords: &[&str]) -> CategoryBucket {
        CategoryBucket {
            category,
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_failed_category_is_isolated() {
        let buckets = vec![
            bucket(Category::Technology, &["AI"]),
            bucket(Category::Finance, &["Stocks"]),
            bucket(Category::LocalNews, &[]),
        ];

        let results = collect_suggestions(Arc::new(FixedExpander), buckets, ExpansionPolicy::default()).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].category, Category::Technology);
        assert_eq!(results[0].suggestions, vec!["Chips", "Cloud", "5G"]);
    }

    #[tokio::test]
    async fn test_disabled_expander_skips_calls() {
        let buckets = vec![bucket(Category::Technology, &["AI"])];
        let results = collect_suggestions(
            Arc::new(crate::services::DisabledExpander),
            buckets,
            ExpansionPolicy::default(),
        )
        .await;
        assert!(results.is_empty());
    }

    #[test]
    fn test_merge_never_overwrites() {
        let mut keywords = KeywordSet::new();
        keywords.insert_if_absent("AI", 1.0, KeywordSource::User);

        let batches = vec![
            CategorySuggestions {
                category: Category::Technology,
                suggestions: vec!["AI".into(), "Chips".into()],
            },
            CategorySuggestions {
                category: Category::Finance,
                suggestions: vec!["Chips".into(), "".into()],
            },
        ];

        let added = merge_suggestions(&mut keywords, &batches, 0.65, "gpt-4o-mini");

        assert_eq!(added, 1);
        assert_eq!(keywords.get("AI").unwrap().weight, 1.0);
        assert!(keywords.get("AI").unwrap().source.is_user());
        assert_eq!(keywords.get("Chips").unwrap().weight, 0.65);
        assert_eq!(keywords.get("Chips").unwrap().source.as_str(), "gpt-4o-mini");
    }

    #[test]
    fn test_policy_clamps_retries() {
        let policy = ExpansionPolicy::new(Duration::from_secs(10), 5, 3);
        assert_eq!(policy.retries, 1);
        assert_eq!(policy.deadline, Duration::from_secs(20));
    }
}
