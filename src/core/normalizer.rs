use crate::core::error::ProfileError;
use crate::models::{AnswerValue, Category, FieldShape};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// What a survey question feeds into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Comma-separated language list for the language filter
    Language,
    /// Source-preference labels for the source filter
    Sources,
    /// Read for context only, never weighted
    Context,
    /// Main categories ranked by the user
    RankedCategories,
    /// Direct keyword picks
    SubTopic,
    /// Profession and other free-text answers
    FreeText,
    /// Home city for the geo filter
    PrimaryLocation,
}

/// Declared shape and purpose of one survey question
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub shape: FieldShape,
    pub role: FieldRole,
    pub category: Option<Category>,
}

const fn field(
    id: &'static str,
    name: &'static str,
    shape: FieldShape,
    role: FieldRole,
    category: Option<Category>,
) -> FieldSpec {
    FieldSpec { id, name, shape, role, category }
}

/// Onboarding survey questions understood by the engine
pub const SURVEY_SCHEMA: &[FieldSpec] = &[
    field("1", "language", FieldShape::Scalar, FieldRole::Language, None),
    field("2", "news_sources", FieldShape::List, FieldRole::Sources, None),
    field("3", "tone", FieldShape::Scalar, FieldRole::Context, None),
    field("5", "main_categories", FieldShape::RankMap, FieldRole::RankedCategories, None),
    field("7", "technology_topics", FieldShape::List, FieldRole::SubTopic, Some(Category::Technology)),
    field("8", "finance_topics", FieldShape::List, FieldRole::SubTopic, Some(Category::Finance)),
    field("9", "local_topics", FieldShape::List, FieldRole::SubTopic, Some(Category::LocalNews)),
    field("10", "other_interests", FieldShape::List, FieldRole::SubTopic, None),
    field("14", "profession", FieldShape::Scalar, FieldRole::FreeText, Some(Category::Professional)),
    field("15", "industry", FieldShape::Scalar, FieldRole::FreeText, Some(Category::Professional)),
    field("16", "primary_location", FieldShape::Scalar, FieldRole::PrimaryLocation, None),
    field("17", "regions_of_interest", FieldShape::List, FieldRole::FreeText, Some(Category::Geographical)),
];

/// Schema entries with the given role, in schema order
pub fn fields_with_role(role: FieldRole) -> impl Iterator<Item = &'static FieldSpec> {
    SURVEY_SCHEMA.iter().filter(move |spec| spec.role == role)
}

/// Values substituted for missing scalar answers
#[derive(Debug, Clone)]
pub struct SurveyDefaults {
    pub language: String,
    pub city: String,
}

impl Default for SurveyDefaults {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
            city: "Ahmedabad".to_string(),
        }
    }
}

/// A main category with the rank the user gave it (1 = most preferred)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPick {
    pub label: String,
    pub rank: i64,
}

impl RankedPick {
    pub fn new(label: impl Into<String>, rank: i64) -> Self {
        Self { label: label.into(), rank }
    }
}

/// Survey answers coerced into the shapes the schema declares
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedSurvey {
    sequences: HashMap<&'static str, Vec<String>>,
    ranks: HashMap<&'static str, Vec<RankedPick>>,
}

impl NormalizedSurvey {
    /// Normalized sequence for a scalar or list question (empty if absent)
    pub fn sequence(&self, id: &str) -> &[String] {
        self.sequences.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Normalized picks for a rank-map question (empty if absent)
    pub fn ranks(&self, id: &str) -> &[RankedPick] {
        self.ranks.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn with_sequence(mut self, id: &'static str, values: Vec<String>) -> Self {
        self.sequences.insert(id, values);
        self
    }

    pub fn with_ranks(mut self, id: &'static str, picks: Vec<RankedPick>) -> Self {
        self.ranks.insert(id, picks);
        self
    }
}

/// Resolve the raw JSON shape of one answer
///
/// `null` is treated as an absent answer. Numbers and booleans are accepted
/// where text is expected.
pub fn parse_answer(field: &str, value: &Value) -> Result<Option<AnswerValue>, ProfileError> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                if let Some(text) = scalar_text(field, item)? {
                    list.push(text);
                }
            }
            Ok(Some(AnswerValue::List(list)))
        }
        Value::Object(map) => {
            let mut ranks = BTreeMap::new();
            for (label, rank) in map {
                let rank = rank_number(rank).ok_or_else(|| {
                    ProfileError::malformed(field, format!("rank for '{}' must be an integer", label))
                })?;
                ranks.insert(label.clone(), rank);
            }
            Ok(Some(AnswerValue::RankMap(ranks)))
        }
        other => Ok(scalar_text(field, other)?.map(AnswerValue::Scalar)),
    }
}

/// Integer rank, also accepting whole floats such as `2.0`
fn rank_number(value: &Value) -> Option<i64> {
    if let Some(rank) = value.as_i64() {
        return Some(rank);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
        .map(|f| f as i64)
}

fn scalar_text(field: &str, value: &Value) -> Result<Option<String>, ProfileError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        _ => Err(ProfileError::malformed(field, "expected text, found a nested structure")),
    }
}

/// Coerce a raw survey payload into typed collections
///
/// Unknown questions are ignored. Missing language and primary location fall
/// back to `defaults`.
pub fn normalize(payload: &Value, defaults: &SurveyDefaults) -> Result<NormalizedSurvey, ProfileError> {
    let object = payload.as_object().ok_or(ProfileError::NotAnObject)?;
    let mut survey = NormalizedSurvey::default();

    for spec in SURVEY_SCHEMA {
        let answer = match object.get(spec.id) {
            Some(raw) => parse_answer(spec.id, raw)?,
            None => None,
        };

        match spec.shape {
            FieldShape::Scalar | FieldShape::List => {
                let mut values = coerce_sequence(spec, answer)?;
                if values.is_empty() {
                    match spec.role {
                        FieldRole::Language => values.push(defaults.language.clone()),
                        FieldRole::PrimaryLocation => values.push(defaults.city.clone()),
                        _ => {}
                    }
                }
                survey.sequences.insert(spec.id, values);
            }
            FieldShape::RankMap => {
                survey.ranks.insert(spec.id, coerce_ranks(spec, answer)?);
            }
        }
    }

    Ok(survey)
}

fn coerce_sequence(spec: &FieldSpec, answer: Option<AnswerValue>) -> Result<Vec<String>, ProfileError> {
    let raw = match answer {
        None => Vec::new(),
        Some(AnswerValue::Scalar(s)) => vec![s],
        Some(AnswerValue::List(items)) => items,
        Some(AnswerValue::RankMap(_)) => {
            return Err(ProfileError::malformed(spec.id, "expected text, found a rank map"));
        }
    };

    Ok(raw
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

fn coerce_ranks(spec: &FieldSpec, answer: Option<AnswerValue>) -> Result<Vec<RankedPick>, ProfileError> {
    let mut picks: Vec<RankedPick> = match answer {
        None => Vec::new(),
        Some(AnswerValue::Scalar(label)) => vec![RankedPick::new(label, 1)],
        // A plain list is ranked by position
        Some(AnswerValue::List(labels)) => labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| RankedPick::new(label, i as i64 + 1))
            .collect(),
        Some(AnswerValue::RankMap(map)) => {
            let mut picks = Vec::with_capacity(map.len());
            for (label, rank) in map {
                if rank < 1 {
                    return Err(ProfileError::InvalidRank { category: label, rank });
                }
                picks.push(RankedPick::new(label, rank));
            }
            picks
        }
    };

    for pick in &mut picks {
        pick.label = pick.label.trim().to_string();
    }
    picks.retain(|p| !p.label.is_empty());
    picks.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.label.cmp(&b.label)));

    let mut seen = std::collections::HashSet::new();
    picks.retain(|p| seen.insert(p.label.clone()));

    tracing::trace!(field = spec.name, count = picks.len(), "normalized rank map");
    Ok(picks)
}
