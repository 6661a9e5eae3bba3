// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AnswerValue, Category, CategoryBucket, FieldShape, FilterSet, KeywordEntry, KeywordSource,
    PreferenceProfile, WeightRules,
};
pub use requests::GenerateKeywordsRequest;
pub use responses::{ErrorResponse, ExtractedKeyword, GenerateKeywordsResponse, HealthResponse};
