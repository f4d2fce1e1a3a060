use serde::{Deserialize, Serialize};

/// Input to an extractive question-answering model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QaInput<'a> {
    pub question: &'a str,
    pub context: &'a str,
}

impl<'a> QaInput<'a> {
    pub fn new(question: &'a str, context: &'a str) -> Self {
        Self { question, context }
    }
}

/// Raw span selected by the model
///
/// `start` and `end` are character offsets into the context, which is how
/// hosted question-answering pipelines report them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSpan {
    pub answer: String,

    #[serde(default)]
    pub score: f32,

    #[serde(default)]
    pub start: usize,

    #[serde(default)]
    pub end: usize,
}

impl ExtractedSpan {
    /// Whether the answer text really occurs in `context`
    ///
    /// Offsets are checked first; a plain substring match is accepted when
    /// the offsets disagree with the text. The empty answer (no-answer
    /// prediction) is always a span.
    pub fn is_span_of(&self, context: &str) -> bool {
        if self.answer.is_empty() {
            return true;
        }
        if span_text(context, self.start, self.end) == Some(self.answer.as_str()) {
            return true;
        }
        context.contains(&self.answer)
    }

    /// This span with offsets that resolve to `answer` within `context`
    ///
    /// Offsets that already point at the answer are kept. Otherwise they are
    /// moved to the first occurrence of the answer text. Returns `None` when
    /// the answer does not occur in `context`.
    pub fn anchored_in(mut self, context: &str) -> Option<Self> {
        if self.answer.is_empty()
            || span_text(context, self.start, self.end) == Some(self.answer.as_str())
        {
            return Some(self);
        }

        let byte_start = context.find(&self.answer)?;
        self.start = context[..byte_start].chars().count();
        self.end = self.start + self.answer.chars().count();
        Some(self)
    }
}

/// Resolve character offsets `[start, end)` to a borrowed slice of `context`
pub fn span_text(context: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let byte_offset = |n: usize| {
        context
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(context.len()))
            .nth(n)
    };
    let from = byte_offset(start)?;
    let to = byte_offset(end)?;
    context.get(from..to)
}
