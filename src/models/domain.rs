use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// One survey answer after its raw JSON shape has been resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValue {
    Scalar(String),
    List(Vec<String>),
    RankMap(BTreeMap<String, i64>),
}

/// Shape a survey question is declared to have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    Scalar,
    List,
    RankMap,
}

/// Topical bucket used to scope expansion calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Technology,
    Finance,
    #[serde(rename = "Local News")]
    LocalNews,
    Professional,
    Geographical,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Technology,
        Category::Finance,
        Category::LocalNews,
        Category::Professional,
        Category::Geographical,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Technology => "Technology",
            Category::Finance => "Finance",
            Category::LocalNews => "Local News",
            Category::Professional => "Professional",
            Category::Geographical => "Geographical",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a keyword came from
///
/// Serialized as `"user"` for survey-derived keywords and as the expansion
/// model identifier for suggested ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordSource {
    User,
    Ai { model: String },
}

impl KeywordSource {
    pub fn ai(model: impl Into<String>) -> Self {
        KeywordSource::Ai { model: model.into() }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, KeywordSource::User)
    }

    pub fn as_str(&self) -> &str {
        match self {
            KeywordSource::User => "user",
            KeywordSource::Ai { model } => model,
        }
    }
}

impl Serialize for KeywordSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single weighted keyword in the profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub weight: f64,
    pub source: KeywordSource,
}

/// Keywords collected from the fields mapped to one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBucket {
    pub category: Category,
    pub keywords: Vec<String>,
}

impl CategoryBucket {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            keywords: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Keywords in first-seen order with duplicates removed
    pub fn unique_keywords(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.keywords
            .iter()
            .filter(|k| seen.insert(k.as_str()))
            .cloned()
            .collect()
    }
}

/// Auxiliary feed filters derived from the survey
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSet {
    pub language: BTreeSet<String>,
    pub geo: BTreeSet<String>,
    pub source: BTreeSet<String>,
}

/// Final output of the preference-aggregation engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceProfile {
    pub keywords: Vec<KeywordEntry>,
    pub language_filter: BTreeSet<String>,
    pub source_filter: BTreeSet<String>,
    pub geo_filter: BTreeSet<String>,
}

/// Weight rules applied by the keyword weighting engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightRules {
    pub sub_topic: f64,
    pub free_text: f64,
    pub rank_ceiling: f64,
    pub rank_step: f64,
    pub rank_floor: f64,
    pub suggestion: f64,
}

impl Default for WeightRules {
    fn default() -> Self {
        Self {
            sub_topic: 1.0,
            free_text: 0.8,
            rank_ceiling: 1.1,
            rank_step: 0.1,
            rank_floor: 0.5,
            suggestion: 0.65,
        }
    }
}

impl WeightRules {
    /// Weight for a ranked main-category pick: `max(floor, ceiling - rank * step)`
    ///
    /// Rounded to two decimals so that rank 3 yields exactly 0.8.
    pub fn rank_weight(&self, rank: u32) -> f64 {
        let raw = self.rank_ceiling - f64::from(rank) * self.rank_step;
        round2(raw.max(self.rank_floor)).min(1.0)
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_weight_table() {
        let rules = WeightRules::default();
        assert_eq!(rules.rank_weight(1), 1.0);
        assert_eq!(rules.rank_weight(2), 0.9);
        assert_eq!(rules.rank_weight(3), 0.8);
        assert_eq!(rules.rank_weight(5), 0.6);
        assert_eq!(rules.rank_weight(6), 0.5);
        assert_eq!(rules.rank_weight(10), 0.5);
        assert_eq!(rules.rank_weight(u32::MAX), 0.5);
    }

    #[test]
    fn test_source_serialization() {
        let user = serde_json::to_value(KeywordSource::User).unwrap();
        let ai = serde_json::to_value(KeywordSource::ai("gpt-4o-mini")).unwrap();
        assert_eq!(user, "user");
        assert_eq!(ai, "gpt-4o-mini");
    }

    #[test]
    fn test_bucket_unique_keywords_keeps_first_order() {
        let bucket = CategoryBucket {
            category: Category::Technology,
            keywords: vec!["AI".into(), "Cloud".into(), "AI".into(), "Chips".into()],
        };
        assert_eq!(bucket.unique_keywords(), vec!["AI", "Cloud", "Chips"]);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::LocalNews.label(), "Local News");
        assert_eq!(Category::ALL.len(), 5);
    }
}
