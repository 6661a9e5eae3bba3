use crate::core::error::ProfileError;
use crate::core::normalizer::{fields_with_role, FieldRole, NormalizedSurvey};
use crate::models::{KeywordEntry, KeywordSource, WeightRules};
use std::collections::HashMap;

/// Canonical keyword mapping: one entry per exact keyword text, kept in
/// first-insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordSet {
    entries: Vec<KeywordEntry>,
    index: HashMap<String, usize>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.index.contains_key(keyword)
    }

    pub fn get(&self, keyword: &str) -> Option<&KeywordEntry> {
        self.index.get(keyword).map(|&i| &self.entries[i])
    }

    /// Insert unless the keyword already exists. Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, keyword: &str, weight: f64, source: KeywordSource) -> bool {
        if self.index.contains_key(keyword) {
            return false;
        }
        self.index.insert(keyword.to_string(), self.entries.len());
        self.entries.push(KeywordEntry {
            keyword: keyword.to_string(),
            weight,
            source,
        });
        true
    }

    /// Insert, or raise an existing weight to `weight` if that is higher.
    /// The source of an existing entry is left untouched.
    pub fn raise_or_insert(&mut self, keyword: &str, weight: f64, source: KeywordSource) {
        match self.index.get(keyword) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                entry.weight = entry.weight.max(weight);
            }
            None => {
                self.insert_if_absent(keyword, weight, source);
            }
        }
    }

    pub fn entries(&self) -> &[KeywordEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<KeywordEntry> {
        self.entries
    }
}

/// Apply the weighting rules to a normalized survey
///
/// Rules run in fixed order and the first writer wins:
/// 1. sub-topic picks at `rules.sub_topic`
/// 2. free-text answers at `rules.free_text`
/// 3. ranked categories at `rules.rank_weight(rank)`, which may only raise
///    an existing weight
pub fn weigh_keywords(survey: &NormalizedSurvey, rules: &WeightRules) -> Result<KeywordSet, ProfileError> {
    let mut keywords = KeywordSet::new();

    for spec in fields_with_role(FieldRole::SubTopic) {
        for keyword in survey.sequence(spec.id) {
            insert_trimmed(&mut keywords, keyword, rules.sub_topic);
        }
    }

    for spec in fields_with_role(FieldRole::FreeText) {
        for keyword in survey.sequence(spec.id) {
            insert_trimmed(&mut keywords, keyword, rules.free_text);
        }
    }

    for spec in fields_with_role(FieldRole::RankedCategories) {
        for pick in survey.ranks(spec.id) {
            if pick.rank < 1 {
                return Err(ProfileError::InvalidRank {
                    category: pick.label.clone(),
                    rank: pick.rank,
                });
            }
            let label = pick.label.trim();
            if label.is_empty() {
                continue;
            }
            let rank = u32::try_from(pick.rank).unwrap_or(u32::MAX);
            keywords.raise_or_insert(label, rules.rank_weight(rank), KeywordSource::User);
        }
    }

    tracing::debug!(count = keywords.len(), "weighted survey keywords");
    Ok(keywords)
}

fn insert_trimmed(keywords: &mut KeywordSet, raw: &str, weight: f64) {
    let keyword = raw.trim();
    if !keyword.is_empty() {
        keywords.insert_if_absent(keyword, weight, KeywordSource::User);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalizer::RankedPick;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sub_topics_get_full_weight() {
        let survey = NormalizedSurvey::default().with_sequence("7", strings(&["AI", "Robotics"]));
        let keywords = weigh_keywords(&survey, &WeightRules::default()).unwrap();

        assert_eq!(keywords.get("AI").unwrap().weight, 1.0);
        assert_eq!(keywords.get("Robotics").unwrap().weight, 1.0);
        assert!(keywords.get("AI").unwrap().source.is_user());
    }

    #[test]
    fn test_free_text_skips_blank() {
        let survey = NormalizedSurvey::default()
            .with_sequence("14", strings(&["  "]))
            .with_sequence("15", strings(&["Healthcare"]));
        let keywords = weigh_keywords(&survey, &WeightRules::default()).unwrap();

        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords.get("Healthcare").unwrap().weight, 0.8);
    }

    #[test]
    fn test_rank_rule_raises_but_never_lowers() {
        let survey = NormalizedSurvey::default()
            .with_sequence("14", strings(&["Finance", "Sports"]))
            .with_ranks("5", vec![RankedPick::new("Finance", 1), RankedPick::new("Sports", 5)]);
        let keywords = weigh_keywords(&survey, &WeightRules::default()).unwrap();

        assert_eq!(keywords.get("Finance").unwrap().weight, 1.0);
        assert_eq!(keywords.get("Sports").unwrap().weight, 0.8);
    }

    #[test]
    fn test_first_writer_wins_between_fixed_rules() {
        let survey = NormalizedSurvey::default()
            .with_sequence("10", strings(&["Politics"]))
            .with_sequence("17", strings(&["Politics"]));
        let keywords = weigh_keywords(&survey, &WeightRules::default()).unwrap();

        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords.get("Politics").unwrap().weight, 1.0);
    }

    #[test]
    fn test_invalid_rank_rejected() {
        let survey = NormalizedSurvey::default().with_ranks("5", vec![RankedPick::new("Sports", 0)]);
        let err = weigh_keywords(&survey, &WeightRules::default()).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidRank { rank: 0, .. }));
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let survey = NormalizedSurvey::default().with_sequence("7", strings(&["AI", "ai"]));
        let keywords = weigh_keywords(&survey, &WeightRules::default()).unwrap();
        assert_eq!(keywords.len(), 2);
    }

    #[test]
    fn test_insert_if_absent_keeps_existing() {
        let mut set = KeywordSet::new();
        assert!(set.insert_if_absent("AI", 1.0, KeywordSource::User));
        assert!(!set.insert_if_absent("AI", 0.65, KeywordSource::ai("model")));
        assert_eq!(set.get("AI").unwrap().weight, 1.0);
        assert!(set.get("AI").unwrap().source.is_user());
    }
}
