use serde::Serialize;
use wikiqa_core::models::SearchResult;

/// The Wikipedia page an answer was read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReference {
    /// Page title used to fetch the content
    pub title: String,

    /// URL slug of the article
    pub key: String,

    /// Short description from search, if any
    pub description: Option<String>,

    /// Article URL on the configured language edition
    pub url: String,
}

impl SourceReference {
    pub fn from_search_result(result: &SearchResult, language: &str) -> Self {
        Self {
            title: result.title.clone(),
            key: result.key.clone(),
            description: result.description.clone(),
            url: result.article_url(language),
        }
    }
}

/// Full outcome of one pipeline run
///
/// `get_response` callers only ever see `answer`; the rest exists for
/// explanation output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QaReport {
    /// Question as sent to the model
    pub question: String,

    /// Extracted span text
    pub answer: String,

    /// Model confidence; not thresholded
    pub score: f32,

    /// Character offsets of the answer in the context
    pub start: usize,
    pub end: usize,

    /// Model that produced the span
    pub model: String,

    /// Page the context came from
    pub source: SourceReference,

    /// Length of the context in characters
    pub context_chars: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_reference_from_search_result() {
        let result = SearchResult::new("Gare du Nord", "Gare_du_Nord")
            .with_description("Railway station in Paris");
        let source = SourceReference::from_search_result(&result, "fr");
        assert_eq!(source.title, "Gare du Nord");
        assert_eq!(source.url, "https://fr.wikipedia.org/wiki/Gare_du_Nord");
        assert_eq!(source.description.as_deref(), Some("Railway station in Paris"));
    }
}
