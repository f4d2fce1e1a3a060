//! In-process extractive question answering with Candle
//!
//! Runs a BERT checkpoint fine-tuned for SQuAD-style span extraction on the
//! CPU. `name` is read as a directory when one exists at that path, and as a
//! Hugging Face Hub repository id otherwise; Hub files are cached by
//! `hf-hub` and reused on the next run.
//!
//! Loading is deferred to the first question, so commands that only search
//! or fetch never touch the checkpoint.

use crate::ports::QuestionAnswerer;
use crate::provider::DEFAULT_LOCAL_MODEL;
use crate::scoring::{best_span, MAX_ANSWER_TOKENS};
use candle_core::{DType, Device, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use hf_hub::api::sync::Api;
use serde::Deserialize;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use tokenizers::{Encoding, Tokenizer, TruncationParams, TruncationStrategy};
use wikiqa_core::error::{Result, WikiqaError};
use wikiqa_core::models::{span_text, ExtractedSpan, QaInput};

/// Tokens per window, question and special tokens included
const MAX_SEQUENCE_TOKENS: usize = 384;

/// Context tokens shared by consecutive windows
const WINDOW_STRIDE: usize = 128;

/// Weight files tried in order
const WEIGHT_FILES: [&str; 2] = ["model.safetensors", "pytorch_model.bin"];

/// Question-answering reader running a local BERT checkpoint
pub struct LocalReader {
    /// Directory path or Hub repository id
    name: String,
    device: Device,
    model: OnceCell<LoadedModel>,
}

struct LoadedModel {
    bert: BertModel,
    qa_outputs: Linear,
    tokenizer: Tokenizer,
}

/// Fields of `config.json` checked before any weights are read
#[derive(Debug, Deserialize)]
struct Architecture {
    model_type: Option<String>,
    hidden_size: usize,
}

struct CheckpointFiles {
    config: PathBuf,
    tokenizer: PathBuf,
    weights: PathBuf,
}

impl LocalReader {
    /// Create a reader for `name`; nothing is loaded until the first answer
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            device: Device::Cpu,
            model: OnceCell::new(),
        }
    }

    fn model(&self) -> Result<&LoadedModel> {
        if let Some(model) = self.model.get() {
            return Ok(model);
        }
        let loaded = self.load()?;
        Ok(self.model.get_or_init(|| loaded))
    }

    fn load(&self) -> Result<LoadedModel> {
        tracing::info!(model = %self.name, "Loading local question-answering model");
        let files = self.locate()?;

        let raw_config = std::fs::read_to_string(&files.config).map_err(|e| {
            self.unavailable(format!("Failed to read {}: {}", files.config.display(), e))
        })?;
        let architecture: Architecture = serde_json::from_str(&raw_config)
            .map_err(|e| self.unavailable(format!("Invalid config.json: {}", e)))?;
        if architecture.model_type.as_deref() != Some("bert") {
            return Err(WikiqaError::ConfigInvalid {
                key: "model".to_string(),
                reason: format!(
                    "'{}' is a {} checkpoint; local inference runs BERT models only",
                    self.name,
                    architecture.model_type.as_deref().unwrap_or("untyped")
                ),
            });
        }
        let bert_config: BertConfig = serde_json::from_str(&raw_config)
            .map_err(|e| self.unavailable(format!("Invalid BERT config.json: {}", e)))?;

        tracing::debug!(weights = %files.weights.display(), "Loading weights");
        let vb = if files.weights.extension().is_some_and(|ext| ext == "safetensors") {
            let tensors = candle_core::safetensors::load(&files.weights, &self.device)
                .map_err(|e| self.unavailable(format!("Failed to load safetensors: {}", e)))?;
            VarBuilder::from_tensors(tensors, DType::F32, &self.device)
        } else {
            VarBuilder::from_pth(&files.weights, DType::F32, &self.device)
                .map_err(|e| self.unavailable(format!("Failed to load PyTorch weights: {}", e)))?
        };

        let bert = BertModel::load(vb.clone(), &bert_config)
            .map_err(|e| self.unavailable(format!("Failed to build BERT model: {}", e)))?;
        let qa_outputs = candle_nn::linear(architecture.hidden_size, 2, vb.pp("qa_outputs"))
            .map_err(|e| {
                self.unavailable(format!("Checkpoint has no question-answering head: {}", e))
            })?;

        let mut tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| self.unavailable(format!("Failed to load tokenizer.json: {}", e)))?;
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_TOKENS,
                stride: WINDOW_STRIDE,
                strategy: TruncationStrategy::OnlySecond,
                ..Default::default()
            }))
            .map_err(|e| self.unavailable(format!("Invalid truncation settings: {}", e)))?;

        tracing::info!(model = %self.name, "Local model loaded");
        Ok(LoadedModel {
            bert,
            qa_outputs,
            tokenizer,
        })
    }

    fn locate(&self) -> Result<CheckpointFiles> {
        let dir = Path::new(&self.name);
        if dir.is_dir() {
            let weights = WEIGHT_FILES
                .iter()
                .map(|file| dir.join(file))
                .find(|path| path.is_file())
                .ok_or_else(|| {
                    self.unavailable(format!("No model weights found in {}", dir.display()))
                })?;
            return Ok(CheckpointFiles {
                config: dir.join("config.json"),
                tokenizer: dir.join("tokenizer.json"),
                weights,
            });
        }

        let api =
            Api::new().map_err(|e| self.unavailable(format!("Hugging Face Hub error: {}", e)))?;
        let repo = api.model(self.name.clone());
        let fetch = |file: &str| {
            repo.get(file)
                .map_err(|e| self.unavailable(format!("Failed to download {}: {}", file, e)))
        };

        let weights = match repo.get(WEIGHT_FILES[0]) {
            Ok(path) => path,
            Err(_) => fetch(WEIGHT_FILES[1])?,
        };
        Ok(CheckpointFiles {
            config: fetch("config.json")?,
            tokenizer: fetch("tokenizer.json")?,
            weights,
        })
    }

    /// `[start, end]` logit pairs for every token of one window
    fn logits(
        &self,
        model: &LoadedModel,
        window: &Encoding,
    ) -> candle_core::Result<Vec<Vec<f32>>> {
        let ids = Tensor::new(window.get_ids(), &self.device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(window.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let mask = Tensor::new(window.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let hidden = model.bert.forward(&ids, &type_ids, Some(&mask))?;
        model.qa_outputs.forward(&hidden)?.squeeze(0)?.to_vec2::<f32>()
    }

    fn best_in_window(
        &self,
        model: &LoadedModel,
        window: &Encoding,
        context: &str,
    ) -> Result<Option<ExtractedSpan>> {
        let logits = self
            .logits(model, window)
            .map_err(|e| self.unavailable(format!("Inference failed: {}", e)))?;
        let (start_logits, end_logits): (Vec<f32>, Vec<f32>) = logits
            .iter()
            .map(|pair| (pair[0], pair[1]))
            .unzip();
        let is_context: Vec<bool> = window
            .get_sequence_ids()
            .iter()
            .map(|sequence| *sequence == Some(1))
            .collect();

        let Some(tokens) = best_span(&start_logits, &end_logits, &is_context, MAX_ANSWER_TOKENS)
        else {
            return Ok(None);
        };

        let offsets = window.get_offsets();
        let (start, end) = match (offsets.get(tokens.start), offsets.get(tokens.end)) {
            (Some(first), Some(last)) => (first.0, last.1),
            _ => return Err(WikiqaError::malformed(&self.name, "token offsets out of range")),
        };
        let answer = span_text(context, start, end).ok_or_else(|| {
            WikiqaError::malformed(&self.name, "token offsets outside the context")
        })?;

        Ok(Some(ExtractedSpan {
            answer: answer.to_string(),
            score: tokens.score,
            start,
            end,
        }))
    }

    fn unavailable(&self, reason: String) -> WikiqaError {
        WikiqaError::ModelUnavailable {
            reason,
            remediation: format!(
                "Point --model at a BERT question-answering checkpoint with tokenizer.json, \
                 e.g. local:{}",
                DEFAULT_LOCAL_MODEL
            ),
        }
    }
}

impl QuestionAnswerer for LocalReader {
    fn answer(&self, input: &QaInput<'_>) -> Result<ExtractedSpan> {
        let model = self.model()?;
        let encoding = model
            .tokenizer
            .encode_char_offsets((input.question, input.context), true)
            .map_err(|e| self.unavailable(format!("Tokenization failed: {}", e)))?;

        let windows: Vec<&Encoding> =
            std::iter::once(&encoding).chain(encoding.get_overflowing()).collect();
        tracing::debug!(model = %self.name, windows = windows.len(), "Scoring context windows");

        let mut best: Option<ExtractedSpan> = None;
        for window in windows {
            if let Some(span) = self.best_in_window(model, window, input.context)? {
                if best.as_ref().map_or(true, |b| span.score > b.score) {
                    best = Some(span);
                }
            }
        }

        // No context tokens at all: report the empty no-answer span
        Ok(best.unwrap_or(ExtractedSpan {
            answer: String::new(),
            score: 0.0,
            start: 0,
            end: 0,
        }))
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defers_loading() {
        let reader = LocalReader::new("deepset/bert-base-cased-squad2");
        assert_eq!(reader.model_name(), "deepset/bert-base-cased-squad2");
        assert!(reader.model.get().is_none());
    }

    #[test]
    fn test_directory_without_weights_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();

        let reader = LocalReader::new(dir.path().to_string_lossy());
        let err = reader
            .answer(&QaInput::new("Where?", "Here."))
            .unwrap_err();
        assert!(matches!(
            err,
            WikiqaError::ModelUnavailable { ref reason, .. } if reason.contains("No model weights")
        ));
    }

    #[test]
    fn test_non_bert_checkpoint_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = r#"{"model_type":"roberta","hidden_size":768}"#;
        std::fs::write(dir.path().join("config.json"), config).unwrap();
        std::fs::write(dir.path().join("model.safetensors"), b"").unwrap();

        let reader = LocalReader::new(dir.path().to_string_lossy());
        let err = reader
            .answer(&QaInput::new("Where?", "Here."))
            .unwrap_err();
        assert!(matches!(
            err,
            WikiqaError::ConfigInvalid { ref reason, .. } if reason.contains("roberta")
        ));
    }
}
