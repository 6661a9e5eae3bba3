// Unit tests for Feed Profile

use feed_profile::core::{
    filters::resolve_filters,
    grouper::group_by_category,
    normalizer::normalize,
    weighting::weigh_keywords,
    ExtractionParams, KeywordExtractor, LookupTables, StatisticalExtractor, SurveyDefaults,
};
use feed_profile::models::{Category, WeightRules};
use feed_profile::services::parse_suggestions;
use serde_json::json;

#[test]
fn test_rank_weight_examples() {
    let rules = WeightRules::default();
    assert_eq!(rules.rank_weight(1), 1.0);
    assert_eq!(rules.rank_weight(2), 0.9);
    assert_eq!(rules.rank_weight(5), 0.6);
    assert_eq!(rules.rank_weight(10), 0.5);
}

#[test]
fn test_rank_weight_non_increasing() {
    let rules = WeightRules::default();
    let weights: Vec<f64> = (1..=30).map(|r| rules.rank_weight(r)).collect();
    assert!(weights.windows(2).all(|w| w[0] >= w[1]));
    assert!(weights.iter().all(|&w| w >= 0.5 && w <= 1.0));
}

#[test]
fn test_normalize_then_weigh() {
    let survey = normalize(
        &json!({"7": "AI", "8": ["Stocks", "AI"], "15": " Fintech ", "5": ["Finance", "Stocks"]}),
        &SurveyDefaults::default(),
    )
    .unwrap();

    let keywords = weigh_keywords(&survey, &WeightRules::default()).unwrap();
    let entries: Vec<(&str, f64)> = keywords.entries().iter().map(|e| (e.keyword.as_str(), e.weight)).collect();

    assert_eq!(
        entries,
        vec![("AI", 1.0), ("Stocks", 1.0), ("Fintech", 0.8), ("Finance", 1.0)]
    );
}

#[test]
fn test_grouping_follows_schema() {
    let survey = normalize(
        &json!({"7": ["AI"], "9": ["Traffic"], "17": ["Kutch"], "14": "Doctor"}),
        &SurveyDefaults::default(),
    )
    .unwrap();

    let buckets = group_by_category(&survey);
    let get = |c: Category| buckets.iter().find(|b| b.category == c).unwrap().keywords.clone();

    assert_eq!(get(Category::Technology), vec!["AI"]);
    assert_eq!(get(Category::LocalNews), vec!["Traffic"]);
    assert_eq!(get(Category::Geographical), vec!["Kutch"]);
    assert_eq!(get(Category::Professional), vec!["Doctor"]);
    assert!(get(Category::Finance).is_empty());
}

#[test]
fn test_filters_from_raw_survey() {
    let survey = normalize(
        &json!({"1": "Gujarati,English", "2": ["International"], "16": "mumbai"}),
        &SurveyDefaults::default(),
    )
    .unwrap();

    let filters = resolve_filters(&survey, &LookupTables::builtin(), "English");

    assert!(filters.language.contains("Gujarati"));
    assert!(filters.language.contains("English"));
    assert!(filters.geo.contains("Maharashtra"));
    assert!(filters.source.contains("reuters.com"));
}

#[test]
fn test_default_city_drives_geo_filter() {
    let defaults = SurveyDefaults {
        language: "English".to_string(),
        city: "Pune".to_string(),
    };
    let survey = normalize(&json!({}), &defaults).unwrap();
    let filters = resolve_filters(&survey, &LookupTables::builtin(), &defaults.language);

    assert!(filters.geo.contains("Pune"));
    assert!(filters.geo.contains("Maharashtra"));
}

#[test]
fn test_parse_suggestions_contract() {
    assert_eq!(parse_suggestions("```\n[\"Rain\"]\n```").unwrap(), vec!["Rain"]);
    assert!(parse_suggestions("null").is_err());
}

#[test]
fn test_extractor_defaults_match_original_service() {
    let params = ExtractionParams::default();
    assert_eq!(params.top_n, 20);
    assert_eq!(params.ngram_range, (1, 2));
    assert_eq!(params.diversity, 0.7);

    let keywords = StatisticalExtractor::new().extract_keywords("Technology AI Stocks Pune Calm", &params);
    assert!(!keywords.is_empty());
    assert!(keywords.len() <= 20);
}
