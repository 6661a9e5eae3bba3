use serde::{Deserialize, Serialize};
use validator::Validate;

/// Upper bound on the words handed to the extractor per request
pub const MAX_EXTRACTION_WORDS: usize = 1000;

/// Request for the extraction-only keyword endpoint
///
/// Every field is optional; the answers are joined into one text blob before
/// extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GenerateKeywordsRequest {
    #[validate(length(max = 50))]
    #[serde(default)]
    pub main_categories: Vec<String>,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub subcategories: Vec<String>,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub location: String,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub tone: String,
    #[validate(length(max = 50))]
    #[serde(default)]
    pub sources: Vec<String>,
    #[validate(length(max = 20))]
    #[serde(default)]
    pub language: Vec<String>,
    #[validate(range(min = 1, max = 50))]
    #[serde(default, alias = "topN")]
    pub top_n: Option<usize>,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default)]
    pub diversity: Option<f64>,
}

impl GenerateKeywordsRequest {
    /// Combine all answers into the text handed to the extractor
    ///
    /// Truncated to the first `MAX_EXTRACTION_WORDS` words.
    pub fn combined_text(&self) -> String {
        self.main_categories
            .iter()
            .chain(&self.subcategories)
            .chain(&self.sources)
            .chain(&self.language)
            .chain([&self.location, &self.tone])
            .flat_map(|s| s.split_whitespace())
            .take(MAX_EXTRACTION_WORDS)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
