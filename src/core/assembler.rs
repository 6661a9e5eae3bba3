use crate::core::weighting::KeywordSet;
use crate::models::{FilterSet, PreferenceProfile};

/// Build the final profile
///
/// Keywords are sorted by weight, highest first. The sort is stable so equal
/// weights keep their insertion order.
pub fn assemble_profile(keywords: KeywordSet, filters: FilterSet) -> PreferenceProfile {
    let mut keywords = keywords.into_entries();
    keywords.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    PreferenceProfile {
        keywords,
        language_filter: filters.language,
        source_filter: filters.source,
        geo_filter: filters.geo,
    }
}
