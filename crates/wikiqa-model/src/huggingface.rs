use crate::ports::QuestionAnswerer;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use wikiqa_core::config::{LayeredConfig, ModelProvider, DEFAULT_MODEL_ENDPOINT};
use wikiqa_core::error::{Result, WikiqaError};
use wikiqa_core::models::{ExtractedSpan, QaInput};

/// Hugging Face question-answering reader
pub struct HuggingFaceReader {
    /// Base URL for inference (e.g., "https://router.huggingface.co/hf-inference/models")
    endpoint: String,

    /// Model repository id (e.g., "deepset/tinyroberta-squad2")
    model: String,

    /// Optional bearer token
    token: Option<String>,

    /// HTTP client
    client: reqwest::blocking::Client,
}

impl HuggingFaceReader {
    /// Create a new reader
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build().map_err(|e| {
            WikiqaError::ModelUnavailable {
                reason: format!("Failed to build HTTP client: {}", e),
                remediation: "Check the TLS configuration of this machine".to_string(),
            }
        })?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            token: None,
            client,
        })
    }

    /// Create with the default hosted inference URL
    pub fn hosted(model: impl Into<String>) -> Result<Self> {
        Self::new(DEFAULT_MODEL_ENDPOINT, model, None)
    }

    /// Authenticate requests with a bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Create from layered configuration
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        let spec = config.model_spec()?;
        if spec.provider != ModelProvider::HuggingFace {
            return Err(WikiqaError::ConfigInvalid {
                key: "model".to_string(),
                reason: format!("'{}' is not a Hugging Face hosted model", config.model.value),
            });
        }

        let reader = Self::new(config.model_endpoint.value.clone(), spec.name, config.timeout())?;
        Ok(match &config.api_token.value {
            Some(token) => reader.with_token(token.clone()),
            None => reader,
        })
    }

    /// URL the question-answering request is posted to
    pub fn inference_url(&self) -> String {
        format!("{}/{}", self.endpoint, self.model)
    }

    fn status_error(&self, status: StatusCode, body: &str) -> WikiqaError {
        let detail = parse_error_message(body).unwrap_or_else(|| status.to_string());
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => WikiqaError::ModelUnavailable {
                reason: format!("Inference request was rejected ({})", detail),
                remediation: "Set HF_TOKEN to a token with inference permissions".to_string(),
            },
            StatusCode::NOT_FOUND => WikiqaError::ModelUnavailable {
                reason: format!("Model '{}' was not found ({})", self.model, detail),
                remediation: "Check the --model value, e.g. huggingface:deepset/tinyroberta-squad2"
                    .to_string(),
            },
            StatusCode::SERVICE_UNAVAILABLE => WikiqaError::ModelUnavailable {
                reason: format!("Model '{}' is loading ({})", self.model, detail),
                remediation: "Wait a few seconds and ask again".to_string(),
            },
            _ => WikiqaError::Network {
                endpoint: self.inference_url(),
                reason: format!("HTTP {}: {}", status, detail),
            },
        }
    }
}

impl QuestionAnswerer for HuggingFaceReader {
    fn answer(&self, input: &QaInput<'_>) -> Result<ExtractedSpan> {
        let url = self.inference_url();
        tracing::debug!(
            model = %self.model,
            context_chars = input.context.chars().count(),
            "Running question-answering inference"
        );

        let mut request = self.client.post(&url).json(&InferenceRequest { inputs: *input });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| WikiqaError::Network {
            endpoint: url.clone(),
            reason: if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.to_string()
            },
        })?;

        let status = response.status();
        let body = response.text().map_err(|e| WikiqaError::Network {
            endpoint: url.clone(),
            reason: format!("Failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            return Err(self.status_error(status, &body));
        }

        parse_inference_response(&url, &body)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Request body for the question-answering task
#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: QaInput<'a>,
}

/// The task returns a bare span, or a ranked list when `top_k` > 1
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Ranked(Vec<ExtractedSpan>),
    Single(ExtractedSpan),
}

#[derive(Debug, Deserialize)]
struct InferenceError {
    error: String,
}

/// Decode a successful inference body into the top span
pub fn parse_inference_response(endpoint: &str, body: &str) -> Result<ExtractedSpan> {
    let response: InferenceResponse = serde_json::from_str(body).map_err(|e| {
        WikiqaError::malformed(endpoint, format!("unexpected question-answering payload: {}", e))
    })?;

    match response {
        InferenceResponse::Single(span) => Ok(span),
        InferenceResponse::Ranked(spans) => spans
            .into_iter()
            .next()
            .ok_or_else(|| WikiqaError::malformed(endpoint, "empty list of answer spans")),
    }
}

fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<InferenceError>(body).ok().map(|e| e.error)
}
