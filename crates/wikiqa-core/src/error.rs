//! Error types for WikiQA

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WikiqaError {
    // Input errors
    #[error("Query must not be empty")]
    EmptyQuery,

    // Transport errors
    #[error("Network error calling {endpoint}: {reason}")]
    Network { endpoint: String, reason: String },

    // Lookup errors
    #[error("No Wikipedia page matched the query '{query}'")]
    EmptySearchResult { query: String },

    #[error("Wikipedia page not found: {title}")]
    PageNotFound { title: String },

    // Decoding errors
    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    // Model errors
    #[error("Answer model unavailable: {reason}. Try: {remediation}")]
    ModelUnavailable {
        reason: String,
        remediation: String,
    },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },
}

impl WikiqaError {
    /// True when the pipeline ran cleanly but Wikipedia had nothing to answer from
    pub fn is_no_result(&self) -> bool {
        matches!(self, WikiqaError::EmptySearchResult { .. } | WikiqaError::PageNotFound { .. })
    }

    /// Shorthand for [`WikiqaError::MalformedResponse`]
    pub fn malformed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        WikiqaError::MalformedResponse {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WikiqaError>;
