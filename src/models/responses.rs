use serde::{Deserialize, Serialize};

/// One extracted keyphrase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedKeyword {
    pub keyword: String,
    pub weight: f64,
}

/// Response for the extraction-only keyword endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateKeywordsResponse {
    pub keywords: Vec<ExtractedKeyword>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub expansion: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
