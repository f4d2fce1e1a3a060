use crate::error::{Result, WikiqaError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Number of search hits kept per query; only the top-ranked page is ever read
pub const NUMBER_OF_RESULTS: u32 = 1;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_USER_AGENT: &str = concat!("wikiqa/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.wikimedia.org/core/v1/wikipedia";
pub const DEFAULT_CONTENT_ENDPOINT: &str = "https://{lang}.wikipedia.org/w/api.php";
pub const DEFAULT_MODEL: &str = "huggingface:deepset/tinyroberta-squad2";
pub const DEFAULT_MODEL_ENDPOINT: &str = "https://router.huggingface.co/hf-inference/models";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Question-answering backend named by a model spec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelProvider {
    /// Hugging Face hosted inference (question-answering task)
    HuggingFace,

    /// In-process inference on a downloaded or on-disk checkpoint
    Local,
}

/// Parsed `provider:model` string, e.g. `huggingface:deepset/tinyroberta-squad2`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    pub provider: ModelProvider,
    pub name: String,
}

/// Layered configuration for WikiQA
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub language: ConfigValue<String>,
    pub user_agent: ConfigValue<String>,
    pub search_endpoint: ConfigValue<String>,
    pub content_endpoint: ConfigValue<String>,
    pub model: ConfigValue<String>,
    pub model_endpoint: ConfigValue<String>,
    pub api_token: ConfigValue<Option<String>>,
    pub timeout_secs: ConfigValue<Option<u64>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            language: ConfigValue::new(DEFAULT_LANGUAGE.to_string(), ConfigSource::Default),
            user_agent: ConfigValue::new(DEFAULT_USER_AGENT.to_string(), ConfigSource::Default),
            search_endpoint: ConfigValue::new(
                DEFAULT_SEARCH_ENDPOINT.to_string(),
                ConfigSource::Default,
            ),
            content_endpoint: ConfigValue::new(
                DEFAULT_CONTENT_ENDPOINT.to_string(),
                ConfigSource::Default,
            ),
            model: ConfigValue::new(DEFAULT_MODEL.to_string(), ConfigSource::Default),
            model_endpoint: ConfigValue::new(
                DEFAULT_MODEL_ENDPOINT.to_string(),
                ConfigSource::Default,
            ),
            api_token: ConfigValue::new(None, ConfigSource::Default),
            timeout_secs: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| WikiqaError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| WikiqaError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(language) = file_config.language {
            self.language.update(parse_language(&language)?, ConfigSource::File);
        }

        if let Some(user_agent) = file_config.user_agent {
            self.user_agent.update(parse_user_agent(&user_agent)?, ConfigSource::File);
        }

        if let Some(endpoint) = file_config.search_endpoint {
            self.search_endpoint.update(endpoint, ConfigSource::File);
        }

        if let Some(endpoint) = file_config.content_endpoint {
            self.content_endpoint.update(endpoint, ConfigSource::File);
        }

        if let Some(model) = file_config.model {
            parse_model_spec(&model)?;
            self.model.update(model, ConfigSource::File);
        }

        if let Some(endpoint) = file_config.model_endpoint {
            self.model_endpoint.update(endpoint, ConfigSource::File);
        }

        if let Some(timeout) = file_config.timeout_secs {
            self.timeout_secs.update(Some(timeout), ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // WIKIQA_LANGUAGE
        if let Ok(language) = env::var("WIKIQA_LANGUAGE") {
            match parse_language(&language) {
                Ok(language) => self.language.update(language, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid WIKIQA_LANGUAGE value '{}': expected a Wikipedia language code such as 'en'",
                    language
                ),
            }
        }

        // WIKIQA_USER_AGENT
        if let Ok(user_agent) = env::var("WIKIQA_USER_AGENT") {
            match parse_user_agent(&user_agent) {
                Ok(user_agent) => self.user_agent.update(user_agent, ConfigSource::Environment),
                Err(_) => tracing::warn!("Ignoring empty WIKIQA_USER_AGENT"),
            }
        }

        if let Ok(endpoint) = env::var("WIKIQA_SEARCH_ENDPOINT") {
            self.search_endpoint.update(endpoint, ConfigSource::Environment);
        }

        if let Ok(endpoint) = env::var("WIKIQA_CONTENT_ENDPOINT") {
            self.content_endpoint.update(endpoint, ConfigSource::Environment);
        }

        // WIKIQA_MODEL
        if let Ok(model) = env::var("WIKIQA_MODEL") {
            match parse_model_spec(&model) {
                Ok(_) => self.model.update(model, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid WIKIQA_MODEL value '{}': expected 'huggingface:<repo>'",
                    model
                ),
            }
        }

        if let Ok(endpoint) = env::var("WIKIQA_MODEL_ENDPOINT") {
            self.model_endpoint.update(endpoint, ConfigSource::Environment);
        }

        // HF_TOKEN is only ever read from the environment
        if let Ok(token) = env::var("HF_TOKEN") {
            if !token.trim().is_empty() {
                self.api_token.update(Some(token.trim().to_string()), ConfigSource::Environment);
            }
        }

        // WIKIQA_TIMEOUT_SECS
        if let Ok(timeout_str) = env::var("WIKIQA_TIMEOUT_SECS") {
            match timeout_str.parse::<u64>() {
                Ok(timeout) => self.timeout_secs.update(Some(timeout), ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid WIKIQA_TIMEOUT_SECS value '{}': expected whole seconds",
                    timeout_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) -> Result<()> {
        if let Some(language) = overrides.language {
            self.language.update(parse_language(&language)?, ConfigSource::Cli);
        }

        if let Some(user_agent) = overrides.user_agent {
            self.user_agent.update(parse_user_agent(&user_agent)?, ConfigSource::Cli);
        }

        if let Some(model) = overrides.model {
            parse_model_spec(&model)?;
            self.model.update(model, ConfigSource::Cli);
        }

        if let Some(timeout) = overrides.timeout_secs {
            self.timeout_secs.update(Some(timeout), ConfigSource::Cli);
        }

        Ok(())
    }

    /// Content endpoint with the `{lang}` placeholder filled in
    pub fn content_endpoint_url(&self) -> String {
        self.content_endpoint.value.replace("{lang}", &self.language.value)
    }

    /// Parsed model spec
    pub fn model_spec(&self) -> Result<ModelSpec> {
        parse_model_spec(&self.model.value)
    }

    /// Request timeout; `None` leaves requests unbounded
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.value.map(Duration::from_secs)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert("language".to_string(), (self.language.value.clone(), self.language.source));

        map.insert(
            "user_agent".to_string(),
            (self.user_agent.value.clone(), self.user_agent.source),
        );

        map.insert(
            "search_endpoint".to_string(),
            (
                format!("{}/{}/search/page", self.search_endpoint.value, self.language.value),
                self.search_endpoint.source,
            ),
        );

        map.insert(
            "content_endpoint".to_string(),
            (self.content_endpoint_url(), self.content_endpoint.source),
        );

        map.insert("model".to_string(), (self.model.value.clone(), self.model.source));

        map.insert(
            "model_endpoint".to_string(),
            (self.model_endpoint.value.clone(), self.model_endpoint.source),
        );

        let token = if self.api_token.value.is_some() { "(set)" } else { "(unset)" };
        map.insert("api_token".to_string(), (token.to_string(), self.api_token.source));

        let timeout = self
            .timeout_secs
            .value
            .map(|secs| format!("{}s", secs))
            .unwrap_or_else(|| "none".to_string());
        map.insert("timeout".to_string(), (timeout, self.timeout_secs.source));

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    language: Option<String>,
    user_agent: Option<String>,
    search_endpoint: Option<String>,
    content_endpoint: Option<String>,
    model: Option<String>,
    model_endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub language: Option<String>,
    pub user_agent: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Parse a Wikipedia language code (`en`, `de`, `zh-yue`, ...)
pub fn parse_language(s: &str) -> Result<String> {
    let code = s.trim().to_lowercase();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(WikiqaError::ConfigInvalid {
            key: "language".to_string(),
            reason: format!("Invalid language code: '{}'. Use a code such as en, fr or de", s),
        });
    }
    Ok(code)
}

/// The identifying header is mandatory for Wikimedia APIs
pub fn parse_user_agent(s: &str) -> Result<String> {
    let user_agent = s.trim();
    if user_agent.is_empty() {
        return Err(WikiqaError::ConfigInvalid {
            key: "user_agent".to_string(),
            reason: "User-Agent must not be empty".to_string(),
        });
    }
    Ok(user_agent.to_string())
}

/// Parse model spec from string
pub fn parse_model_spec(s: &str) -> Result<ModelSpec> {
    let invalid = |reason: String| WikiqaError::ConfigInvalid {
        key: "model".to_string(),
        reason,
    };

    let (provider, name) = s
        .split_once(':')
        .ok_or_else(|| invalid(format!("Invalid model spec: {}. Use provider:model", s)))?;

    let provider = match provider.to_lowercase().as_str() {
        "huggingface" | "hf" => ModelProvider::HuggingFace,
        "local" => ModelProvider::Local,
        other => {
            return Err(invalid(format!(
                "Unknown model provider: {}. Use huggingface or local",
                other
            )))
        }
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(invalid(format!("Model name missing in: {}", s)));
    }

    Ok(ModelSpec {
        provider,
        name: name.to_string(),
    })
}
