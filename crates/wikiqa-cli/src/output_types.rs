use chrono::{DateTime, Utc};
use serde::Serialize;
use wikiqa_retrieval::{QaReport, SourceReference};

/// Output for ask command
#[derive(Debug, Serialize)]
pub struct AskOutput {
    pub question: String,
    pub answer: String,
    pub model: String,
    pub answered_at: DateTime<Utc>,
    pub explanation: Option<AnswerExplanation>,
}

/// Where an answer came from, shown with `--explain`
#[derive(Debug, Serialize)]
pub struct AnswerExplanation {
    pub source: SourceReference,
    pub score: f32,
    pub start: usize,
    pub end: usize,
    pub context_chars: usize,
}

impl AskOutput {
    pub fn from_report(report: QaReport, explain: bool) -> Self {
        let explanation = explain.then(|| AnswerExplanation {
            source: report.source,
            score: report.score,
            start: report.start,
            end: report.end,
            context_chars: report.context_chars,
        });

        Self {
            question: report.question,
            answer: report.answer,
            model: report.model,
            answered_at: Utc::now(),
            explanation,
        }
    }
}

/// Output for search command
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub result: SourceReference,
}

/// Output for fetch command
#[derive(Debug, Serialize)]
pub struct FetchOutput {
    pub title: String,
    pub page_id: u64,
    pub char_count: usize,
    pub truncated: bool,
    pub text: String,
}

/// One row of the config command
#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikiqa_core::models::SearchResult;

    fn report() -> QaReport {
        QaReport {
            question: "What is the capital of France?".to_string(),
            answer: "Paris".to_string(),
            score: 0.97,
            start: 0,
            end: 5,
            model: "deepset/tinyroberta-squad2".to_string(),
            source: SourceReference::from_search_result(&SearchResult::new("Paris", "Paris"), "en"),
            context_chars: 31,
        }
    }

    #[test]
    fn test_explanation_only_when_requested() {
        assert!(AskOutput::from_report(report(), false).explanation.is_none());

        let output = AskOutput::from_report(report(), true);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["answer"], "Paris");
        assert_eq!(json["explanation"]["source"]["url"], "https://en.wikipedia.org/wiki/Paris");
        assert_eq!(json["explanation"]["end"], 5);
        assert!(json["answered_at"].is_string());
    }
}
