use crate::core::{ExpansionPolicy, ExtractionParams, SurveyDefaults};
use crate::models::WeightRules;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub expansion: ExpansionSettings,
    #[serde(default)]
    pub profile: ProfileSettings,
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub extraction: ExtractionSettings,
    #[serde(default)]
    pub tables: TablesSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpansionSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Empty disables expansion
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub retries: u8,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Zero disables the expansion cache
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
}

impl Default for ExpansionSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            retries: 0,
            max_suggestions: default_max_suggestions(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl ExpansionSettings {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn policy(&self) -> ExpansionPolicy {
        ExpansionPolicy::new(Duration::from_secs(self.timeout_secs), self.retries, self.max_suggestions)
    }
}

fn default_endpoint() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_model() -> String { "gpt-4o-mini".to_string() }
fn default_timeout_secs() -> u64 { 90 }
fn default_max_suggestions() -> usize { 3 }
fn default_cache_ttl_secs() -> u64 { 3600 }
fn default_cache_capacity() -> u64 { 1000 }

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileSettings {
    #[serde(default = "default_city")]
    pub default_city: String,
    #[serde(default = "default_language")]
    pub default_language: String,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            default_city: default_city(),
            default_language: default_language(),
        }
    }
}

impl ProfileSettings {
    pub fn defaults(&self) -> SurveyDefaults {
        SurveyDefaults {
            language: self.default_language.clone(),
            city: self.default_city.clone(),
        }
    }
}

fn default_city() -> String { "Ahmedabad".to_string() }
fn default_language() -> String { "English".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_sub_topic_weight")]
    pub sub_topic: f64,
    #[serde(default = "default_free_text_weight")]
    pub free_text: f64,
    #[serde(default = "default_rank_ceiling")]
    pub rank_ceiling: f64,
    #[serde(default = "default_rank_step")]
    pub rank_step: f64,
    #[serde(default = "default_rank_floor")]
    pub rank_floor: f64,
    #[serde(default = "default_suggestion_weight")]
    pub suggestion: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            sub_topic: default_sub_topic_weight(),
            free_text: default_free_text_weight(),
            rank_ceiling: default_rank_ceiling(),
            rank_step: default_rank_step(),
            rank_floor: default_rank_floor(),
            suggestion: default_suggestion_weight(),
        }
    }
}

impl WeightsConfig {
    pub fn rules(&self) -> WeightRules {
        WeightRules {
            sub_topic: self.sub_topic,
            free_text: self.free_text,
            rank_ceiling: self.rank_ceiling,
            rank_step: self.rank_step,
            rank_floor: self.rank_floor,
            suggestion: self.suggestion,
        }
    }
}

fn default_sub_topic_weight() -> f64 { 1.0 }
fn default_free_text_weight() -> f64 { 0.8 }
fn default_rank_ceiling() -> f64 { 1.1 }
fn default_rank_step() -> f64 { 0.1 }
fn default_rank_floor() -> f64 { 0.5 }
fn default_suggestion_weight() -> f64 { 0.65 }

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_ngram_min")]
    pub ngram_min: usize,
    #[serde(default = "default_ngram_max")]
    pub ngram_max: usize,
    #[serde(default = "default_diversity")]
    pub diversity: f64,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            ngram_min: default_ngram_min(),
            ngram_max: default_ngram_max(),
            diversity: default_diversity(),
        }
    }
}

impl ExtractionSettings {
    pub fn params(&self) -> ExtractionParams {
        ExtractionParams {
            top_n: self.top_n,
            ngram_range: (self.ngram_min, self.ngram_max),
            diversity: self.diversity,
        }
    }
}

fn default_top_n() -> usize { 20 }
fn default_ngram_min() -> usize { 1 }
fn default_ngram_max() -> usize { 2 }
fn default_diversity() -> f64 { 0.7 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TablesSettings {
    /// TOML file replacing the built-in geo and source tables
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with FEED_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .add_source(File::with_name("config/default").required(false))
            // Local overrides for development
            .add_source(File::with_name("config/local").required(false))
            // e.g., FEED__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("FEED")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("FEED")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional OpenAI variables on top of the loaded config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(api_key) = env::var("OPENAI_API_KEY") {
        builder = builder.set_override("expansion.api_key", api_key)?;
    }
    if let Ok(model) = env::var("OPENAI_MODEL") {
        builder = builder.set_override("expansion.model", model)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let rules = WeightsConfig::default().rules();
        assert_eq!(rules, WeightRules::default());
    }

    #[test]
    fn test_default_expansion_is_disabled() {
        let expansion = ExpansionSettings::default();
        assert!(!expansion.is_configured());
        assert_eq!(expansion.timeout_secs, 90);

        let policy = expansion.policy();
        assert_eq!(policy.deadline, Duration::from_secs(180));
        assert_eq!(policy.max_suggestions, 3);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("feed-profile-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [profile]
            default_city = "Pune"

            [extraction]
            top_n = 5
            "#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.profile.defaults().city, "Pune");
        assert_eq!(settings.profile.default_language, "English");
        assert_eq!(settings.extraction.params().top_n, 5);
        assert_eq!(settings.extraction.params().ngram_range, (1, 2));
    }
}
