//! Answer-span selection over start and end logits
//!
//! A span is scored as `p(start) * p(end)`, each probability taken from a
//! softmax over the context tokens of one window. Question and special
//! tokens can never start or end an answer.

/// Longest answer, in tokens, considered by [`best_span`]
pub const MAX_ANSWER_TOKENS: usize = 15;

/// Token span chosen from one window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenSpan {
    /// First token of the answer
    pub start: usize,

    /// Last token of the answer, inclusive
    pub end: usize,

    /// Product of the start and end probabilities
    pub score: f32,
}

/// Softmax restricted to the tokens where `is_context` is set
///
/// Masked tokens get probability zero. Returns all zeros when nothing is
/// unmasked.
pub fn masked_softmax(logits: &[f32], is_context: &[bool]) -> Vec<f32> {
    let max = logits
        .iter()
        .zip(is_context)
        .filter(|&(_, &context)| context)
        .map(|(&logit, _)| logit)
        .fold(f32::NEG_INFINITY, f32::max);
    if max == f32::NEG_INFINITY {
        return vec![0.0; logits.len()];
    }

    let exp: Vec<f32> = logits
        .iter()
        .zip(is_context)
        .map(|(&logit, &context)| if context { (logit - max).exp() } else { 0.0 })
        .collect();
    let sum: f32 = exp.iter().sum();
    exp.into_iter().map(|e| e / sum).collect()
}

/// Highest-scoring span with `start <= end` and at most `max_answer_tokens` tokens
pub fn best_span(
    start_logits: &[f32],
    end_logits: &[f32],
    is_context: &[bool],
    max_answer_tokens: usize,
) -> Option<TokenSpan> {
    let len = start_logits.len().min(end_logits.len()).min(is_context.len());
    let is_context = &is_context[..len];
    let start_probs = masked_softmax(&start_logits[..len], is_context);
    let end_probs = masked_softmax(&end_logits[..len], is_context);

    let mut best: Option<TokenSpan> = None;
    for start in (0..len).filter(|&i| is_context[i]) {
        let last = (start + max_answer_tokens).min(len);
        for end in (start..last).filter(|&i| is_context[i]) {
            let score = start_probs[start] * end_probs[end];
            if best.map_or(true, |b| score > b.score) {
                best = Some(TokenSpan { start, end, score });
            }
        }
    }
    best
}
