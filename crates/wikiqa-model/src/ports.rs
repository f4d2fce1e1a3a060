//! Model port definitions

use wikiqa_core::error::Result;
use wikiqa_core::models::{ExtractedSpan, QaInput};

/// Port for extractive question answering
///
/// Implementations are constructed once and reused for every question.
/// Nothing here requires `Send` or `Sync`; callers use a reader from one
/// thread at a time.
pub trait QuestionAnswerer {
    /// Select the span of `input.context` that best answers `input.question`
    ///
    /// # Returns
    /// The answer text with its confidence score and character offsets
    fn answer(&self, input: &QaInput<'_>) -> Result<ExtractedSpan>;

    /// Get the name/identifier of the model
    fn model_name(&self) -> &str;
}

impl<T: QuestionAnswerer + ?Sized> QuestionAnswerer for &T {
    fn answer(&self, input: &QaInput<'_>) -> Result<ExtractedSpan> {
        (**self).answer(input)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

impl<T: QuestionAnswerer + ?Sized> QuestionAnswerer for Box<T> {
    fn answer(&self, input: &QaInput<'_>) -> Result<ExtractedSpan> {
        (**self).answer(input)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
