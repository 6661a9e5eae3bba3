use crate::models::Category;
use crate::services::suggestions::parse_suggestions;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Why an expansion call produced no suggestions
///
/// Never surfaced to API callers; the merger treats every variant as an
/// empty suggestion list.
#[derive(Debug, Error)]
pub enum ExpansionError {
    #[error("expansion is disabled: no credential configured")]
    Disabled,

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("expansion service returned {0}")]
    Status(StatusCode),

    #[error("expansion call timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Semantic-expansion collaborator
#[async_trait]
pub trait Expander: Send + Sync {
    /// Suggest additional keywords related to `keywords` within `category`
    async fn expand(&self, category: Category, keywords: &[String]) -> Result<Vec<String>, ExpansionError>;

    /// Identifier recorded as the source of suggested keywords
    fn model_id(&self) -> &str;

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Expander used when no credential is configured
#[derive(Debug, Clone, Default)]
pub struct DisabledExpander;

#[async_trait]
impl Expander for DisabledExpander {
    async fn expand(&self, _category: Category, _keywords: &[String]) -> Result<Vec<String>, ExpansionError> {
        Err(ExpansionError::Disabled)
    }

    fn model_id(&self) -> &str {
        "disabled"
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Chat-completion client for keyword expansion
///
/// Sends one category-scoped prompt per call and expects the reply to be a
/// JSON array of short keywords.
pub struct ExpansionClient {
    endpoint: String,
    api_key: String,
    model: String,
    max_suggestions: usize,
    client: Client,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl ExpansionClient {
    /// Create a new expansion client
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        timeout: Duration,
        max_suggestions: usize,
    ) -> Result<Self, ExpansionError> {
        let client = Client::builder()
            .user_agent(concat!("feed-profile/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            endpoint,
            api_key,
            model,
            max_suggestions,
            client,
        })
    }

    fn prompt(&self, category: Category, keywords: &[String]) -> String {
        format!(
            "A reader of a news feed is interested in the category \"{}\" and picked these keywords: {}. \
             Suggest up to {} additional related keywords for this category. \
             Each keyword must be 1 to 3 words. \
             Reply with a JSON array of strings only.",
            category.label(),
            keywords.join(", "),
            self.max_suggestions,
        )
    }
}

#[async_trait]
impl Expander for ExpansionClient {
    async fn expand(&self, category: Category, keywords: &[String]) -> Result<Vec<String>, ExpansionError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You suggest short news keywords. Output only a JSON array of strings.".to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: self.prompt(category, keywords),
                },
            ],
            temperature: 0.3,
        };

        tracing::debug!(category = %category, keywords = keywords.len(), "requesting keyword expansion");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExpansionError::Status(response.status()));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ExpansionError::InvalidResponse(format!("unexpected completion body: {}", e)))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ExpansionError::InvalidResponse("completion has no content".into()))?;

        let mut suggestions = parse_suggestions(&content)?;
        suggestions.truncate(self.max_suggestions);
        Ok(suggestions)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_category_and_keywords() {
        let client = ExpansionClient::new(
            "https://llm.test/v1/chat/completions".to_string(),
            "test_key".to_string(),
            "gpt-4o-mini".to_string(),
            Duration::from_secs(5),
            3,
        )
        .unwrap();

        let prompt = client.prompt(Category::LocalNews, &["Traffic".to_string(), "Metro".to_string()]);
        assert!(prompt.contains("\"Local News\""));
        assert!(prompt.contains("Traffic, Metro"));
        assert!(prompt.contains("up to 3"));
        assert_eq!(client.model_id(), "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_disabled_expander_reports_disabled() {
        let expander = DisabledExpander;
        let err = expander.expand(Category::Finance, &["Stocks".to_string()]).await.unwrap_err();
        assert!(matches!(err, ExpansionError::Disabled));
        assert!(!expander.is_enabled());
    }
}
