use crate::core::normalizer::{NormalizedSurvey, SURVEY_SCHEMA};
use crate::models::{Category, CategoryBucket};

/// Partition survey keywords into one bucket per category
///
/// Buckets come back in `Category::ALL` order, including empty ones. Each
/// mapped field's sequence is appended verbatim.
pub fn group_by_category(survey: &NormalizedSurvey) -> Vec<CategoryBucket> {
    let mut buckets: Vec<CategoryBucket> = Category::ALL.iter().copied().map(CategoryBucket::new).collect();

    for spec in SURVEY_SCHEMA {
        let Some(category) = spec.category else {
            continue;
        };
        if let Some(bucket) = buckets.iter_mut().find(|b| b.category == category) {
            bucket.keywords.extend(survey.sequence(spec.id).iter().cloned());
        }
    }

    buckets
}

/// Buckets worth sending to the expansion service
pub fn expandable(buckets: Vec<CategoryBucket>) -> Vec<CategoryBucket> {
    buckets.into_iter().filter(|b| !b.is_empty()).collect()
}
