use crate::core::{
    assembler::assemble_profile,
    error::ProfileError,
    filters::resolve_filters,
    grouper::{expandable, group_by_category},
    merger::{collect_suggestions, merge_suggestions, ExpansionPolicy},
    normalizer::{normalize, SurveyDefaults},
    tables::LookupTables,
    weighting::weigh_keywords,
};
use crate::models::{PreferenceProfile, WeightRules};
use crate::services::{DisabledExpander, Expander};
use serde_json::Value;
use std::sync::Arc;

/// Preference-aggregation pipeline
///
/// # Pipeline Stages
/// 1. Normalize the raw survey
/// 2. Weight user keywords
/// 3. Group keywords by category
/// 4. Expand each nonempty category and merge suggestions
/// 5. Resolve language, geo and source filters
/// 6. Assemble the sorted profile
#[derive(Clone)]
pub struct ProfileEngine {
    rules: WeightRules,
    defaults: SurveyDefaults,
    tables: Arc<LookupTables>,
    expander: Arc<dyn Expander>,
    policy: ExpansionPolicy,
}

impl ProfileEngine {
    pub fn new(
        rules: WeightRules,
        defaults: SurveyDefaults,
        tables: Arc<LookupTables>,
        expander: Arc<dyn Expander>,
        policy: ExpansionPolicy,
    ) -> Self {
        Self {
            rules,
            defaults,
            tables,
            expander,
            policy,
        }
    }

    /// Engine with built-in tables and expansion disabled
    pub fn offline() -> Self {
        Self::new(
            WeightRules::default(),
            SurveyDefaults::default(),
            Arc::new(LookupTables::builtin()),
            Arc::new(DisabledExpander),
            ExpansionPolicy::default(),
        )
    }

    pub fn expansion_enabled(&self) -> bool {
        self.expander.is_enabled()
    }

    pub fn model_id(&self) -> &str {
        self.expander.model_id()
    }

    /// Turn a raw survey payload into a preference profile
    pub async fn build_profile(&self, payload: &Value) -> Result<PreferenceProfile, ProfileError> {
        let survey = normalize(payload, &self.defaults)?;
        let mut keywords = weigh_keywords(&survey, &self.rules)?;

        let buckets = expandable(group_by_category(&survey));
        if !buckets.is_empty() && self.expander.is_enabled() {
            let suggestions = collect_suggestions(Arc::clone(&self.expander), buckets, self.policy).await;
            merge_suggestions(&mut keywords, &suggestions, self.rules.suggestion, self.expander.model_id());
        }

        let filters = resolve_filters(&survey, &self.tables, &self.defaults.language);
        let profile = assemble_profile(keywords, filters);

        if let Some(bad) = profile.keywords.iter().find(|k| !(k.weight > 0.0 && k.weight <= 1.0)) {
            return Err(ProfileError::Internal(format!(
                "keyword '{}' has out-of-range weight {}",
                bad.keyword, bad.weight
            )));
        }

        Ok(profile)
    }
}
