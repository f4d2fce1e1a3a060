//! Reader selection from the configured model spec

use crate::huggingface::HuggingFaceReader;
use crate::ports::QuestionAnswerer;
use wikiqa_core::config::{LayeredConfig, ModelProvider};
use wikiqa_core::error::Result;

/// Repository suggested for `local:` specs
pub const DEFAULT_LOCAL_MODEL: &str = "deepset/bert-base-cased-squad2";

/// Build the reader named by `config.model`
///
/// `huggingface:` specs get the hosted reader. `local:` specs get the
/// in-process reader, which only exists in builds with the `local` feature.
pub fn reader_from_config(config: &LayeredConfig) -> Result<Box<dyn QuestionAnswerer>> {
    let spec = config.model_spec()?;
    tracing::debug!(provider = ?spec.provider, model = %spec.name, "Selecting reader");

    match spec.provider {
        ModelProvider::HuggingFace => Ok(Box::new(HuggingFaceReader::from_config(config)?)),
        ModelProvider::Local => local_reader(spec.name),
    }
}

#[cfg(feature = "local")]
fn local_reader(name: String) -> Result<Box<dyn QuestionAnswerer>> {
    Ok(Box::new(crate::local::LocalReader::new(name)))
}

#[cfg(not(feature = "local"))]
fn local_reader(name: String) -> Result<Box<dyn QuestionAnswerer>> {
    Err(wikiqa_core::error::WikiqaError::ModelUnavailable {
        reason: format!("Local model '{}' needs the local inference feature", name),
        remediation: "Rebuild with --features local, or use --model huggingface:<repo>"
            .to_string(),
    })
}
