use console::style;
use std::fmt;
use wikiqa_core::WikiqaError;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Search returned nothing, or the top hit had no page
pub fn no_answer_found(detail: &str) -> CliError {
    CliError::new("No answer found")
        .with_context(detail.to_string())
        .with_suggestion("Rephrase the question with the name of the subject")
        .with_suggestion("Check the top hit for your words: wikiqa search <QUERY>")
        .with_suggestion("Or try another language edition: --language de")
}

/// Wikimedia or the inference endpoint could not be reached
pub fn network_failure(endpoint: &str, reason: &str) -> CliError {
    CliError::new("Network request failed")
        .with_context(format!("Endpoint: {}\nError: {}", endpoint, reason))
        .with_suggestion("Check your internet connection")
        .with_suggestion("Raise the request timeout: --timeout-secs 60")
        .with_help("Run: wikiqa config")
}

/// A service answered with something other than the documented shape
pub fn malformed_response(endpoint: &str, reason: &str) -> CliError {
    CliError::new("Unexpected response")
        .with_context(format!("Endpoint: {}\nError: {}", endpoint, reason))
        .with_suggestion("Check that the configured endpoints point at the real services")
        .with_suggestion("Run with RUST_LOG=debug for request details")
        .with_help("Run: wikiqa config")
}

/// The question-answering model could not serve the request
pub fn model_unavailable(reason: &str, remediation: &str) -> CliError {
    CliError::new("Answer model unavailable")
        .with_context(format!("Error: {}", reason))
        .with_suggestion(remediation.to_string())
        .with_suggestion("Or use another model: --model huggingface:deepset/roberta-base-squad2")
        .with_help("Run: wikiqa ask --help")
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check wikiqa.toml for typos and unknown keys")
        .with_suggestion("Check WIKIQA_* environment variables")
        .with_help("Run: wikiqa config")
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    let Some(wikiqa_error) = error.downcast_ref::<WikiqaError>() else {
        return CliError::new(format!("{:#}", error));
    };

    match wikiqa_error {
        WikiqaError::EmptyQuery => CliError::new("Query must not be empty")
            .with_suggestion("Pass a question: wikiqa ask \"What is the capital of France?\""),
        WikiqaError::EmptySearchResult { .. } | WikiqaError::PageNotFound { .. } => {
            no_answer_found(&wikiqa_error.to_string())
        }
        WikiqaError::Network { endpoint, reason } => network_failure(endpoint, reason),
        WikiqaError::MalformedResponse { endpoint, reason } => {
            malformed_response(endpoint, reason)
        }
        WikiqaError::ModelUnavailable {
            reason,
            remediation,
        } => model_unavailable(reason, remediation),
        WikiqaError::ConfigInvalid { key, reason } => invalid_config(key, reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_result_errors_share_a_message() {
        let empty = from_anyhow(
            WikiqaError::EmptySearchResult {
                query: "zzqx".to_string(),
            }
            .into(),
        );
        let missing = from_anyhow(
            WikiqaError::PageNotFound {
                title: "Atlantis".to_string(),
            }
            .into(),
        );
        assert_eq!(empty.message, "No answer found");
        assert_eq!(missing.message, "No answer found");
        assert!(missing.context.unwrap().contains("Atlantis"));
    }

    #[test]
    fn test_model_remediation_is_first_suggestion() {
        let error = from_anyhow(
            WikiqaError::ModelUnavailable {
                reason: "Inference request was rejected".to_string(),
                remediation: "Set HF_TOKEN to a token with inference permissions".to_string(),
            }
            .into(),
        );
        assert_eq!(error.suggestions[0], "Set HF_TOKEN to a token with inference permissions");
    }

    #[test]
    fn test_context_chain_is_kept_for_foreign_errors() {
        let error =
            anyhow::anyhow!("disk full").context("Failed to load configuration file wikiqa.toml");
        let cli_error = from_anyhow(error);
        assert!(cli_error.message.contains("disk full"));
        assert!(cli_error.message.contains("wikiqa.toml"));
    }

    #[test]
    fn test_wrapped_config_error_is_recognised() {
        let error = anyhow::Error::from(WikiqaError::ConfigInvalid {
            key: "file".to_string(),
            reason: "unknown field `modle`".to_string(),
        })
        .context("Failed to load configuration file wikiqa.toml");
        let cli_error = from_anyhow(error);
        assert_eq!(cli_error.message, "Invalid configuration: file");
    }
}
