//! Feed Profile - survey-driven keyword profiles for news feed personalization
//!
//! This library turns onboarding survey answers into a weighted, deduplicated
//! keyword profile plus language, geo and source filters. Suggested keywords
//! from an external expansion service are merged in on a best-effort basis.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{ProfileEngine, ProfileError, LookupTables, ExpansionPolicy, StatisticalExtractor};
pub use models::{KeywordEntry, KeywordSource, PreferenceProfile, WeightRules};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let tables = LookupTables::builtin();
        assert!(tables.regions_for("Ahmedabad").is_some());
        assert_eq!(WeightRules::default().rank_weight(1), 1.0);
    }
}
