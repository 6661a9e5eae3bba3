// Core algorithm exports
pub mod assembler;
pub mod engine;
pub mod error;
pub mod extraction;
pub mod filters;
pub mod grouper;
pub mod merger;
pub mod normalizer;
pub mod tables;
pub mod weighting;

pub use assembler::assemble_profile;
pub use engine::ProfileEngine;
pub use error::ProfileError;
pub use extraction::{ExtractionParams, KeywordExtractor, StatisticalExtractor};
pub use filters::resolve_filters;
pub use grouper::group_by_category;
pub use merger::{collect_suggestions, merge_suggestions, CategorySuggestions, ExpansionPolicy};
pub use normalizer::{normalize, NormalizedSurvey, RankedPick, SurveyDefaults};
pub use tables::{LookupTables, TableError};
pub use weighting::{weigh_keywords, KeywordSet};
