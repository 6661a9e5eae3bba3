use crate::core::normalizer::{fields_with_role, FieldRole, NormalizedSurvey};
use crate::core::tables::LookupTables;
use crate::models::FilterSet;
use std::collections::BTreeSet;

/// Language filter: every language answer split on commas and trimmed
///
/// Falls back to `default_language` when nothing usable remains.
pub fn language_filter(survey: &NormalizedSurvey, default_language: &str) -> BTreeSet<String> {
    let mut languages: BTreeSet<String> = fields_with_role(FieldRole::Language)
        .flat_map(|spec| survey.sequence(spec.id))
        .flat_map(|answer| answer.split(','))
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
        .collect();

    if languages.is_empty() {
        languages.insert(default_language.to_string());
    }
    languages
}

/// Geo filter: the city's known regions, or the location itself when unknown
pub fn geo_filter(survey: &NormalizedSurvey, tables: &LookupTables) -> BTreeSet<String> {
    let mut geo = BTreeSet::new();

    for spec in fields_with_role(FieldRole::PrimaryLocation) {
        for location in survey.sequence(spec.id) {
            match tables.regions_for(location) {
                Some(regions) => geo.extend(regions.iter().cloned()),
                None => {
                    geo.insert(location.trim().to_string());
                }
            }
        }
    }

    geo
}

/// Source filter: union of the domains mapped from each selected label
///
/// Unknown labels contribute nothing.
pub fn source_filter(survey: &NormalizedSurvey, tables: &LookupTables) -> BTreeSet<String> {
    fields_with_role(FieldRole::Sources)
        .flat_map(|spec| survey.sequence(spec.id))
        .flat_map(|label| {
            let domains = tables.domains_for(label);
            if domains.is_empty() {
                tracing::debug!(label = %label, "unrecognized source preference");
            }
            domains.iter().cloned()
        })
        .collect()
}

/// Derive all three auxiliary filters
pub fn resolve_filters(survey: &NormalizedSurvey, tables: &LookupTables, default_language: &str) -> FilterSet {
    FilterSet {
        language: language_filter(survey, default_language),
        geo: geo_filter(survey, tables),
        source: source_filter(survey, tables),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_language_split_and_trimmed() {
        let survey = NormalizedSurvey::default().with_sequence("1", vec!["English, Hindi ,,Gujarati".into()]);
        assert_eq!(language_filter(&survey, "English"), set(&["English", "Hindi", "Gujarati"]));
    }

    #[test]
    fn test_language_default_when_empty() {
        let survey = NormalizedSurvey::default();
        assert_eq!(language_filter(&survey, "English"), set(&["English"]));

        let survey = NormalizedSurvey::default().with_sequence("1", vec![" , ".into()]);
        assert_eq!(language_filter(&survey, "English"), set(&["English"]));
    }

    #[test]
    fn test_geo_known_city() {
        let survey = NormalizedSurvey::default().with_sequence("16", vec!["Ahmedabad".into()]);
        assert_eq!(
            geo_filter(&survey, &LookupTables::builtin()),
            set(&["Ahmedabad", "Gujarat", "Gandhinagar"])
        );
    }

    #[test]
    fn test_geo_unknown_city_falls_back() {
        let survey = NormalizedSurvey::default().with_sequence("16", vec!["Timbuktu".into()]);
        assert_eq!(geo_filter(&survey, &LookupTables::builtin()), set(&["Timbuktu"]));
    }

    #[test]
    fn test_sources_union_deduplicated() {
        let mut tables = LookupTables::default();
        tables.sources.insert("A".into(), vec!["a.com".into(), "shared.com".into()]);
        tables.sources.insert("B".into(), vec!["shared.com".into(), "b.com".into()]);

        let survey = NormalizedSurvey::default().with_sequence("2", vec!["A".into(), "B".into(), "Unknown".into()]);
        assert_eq!(source_filter(&survey, &tables), set(&["a.com", "b.com", "shared.com"]));
    }
}
