use wikiqa_core::config::{DEFAULT_LANGUAGE, NUMBER_OF_RESULTS};
use wikiqa_core::error::{Result, WikiqaError};
use wikiqa_core::models::{validate_query, PageContent, QaInput, SearchResult};
use wikiqa_model::ports::QuestionAnswerer;
use wikiqa_wiki::ports::{PageFetcher, PageSearcher};

use crate::models::{QaReport, SourceReference};

/// Question-answering pipeline: search, then fetch, then extract
pub struct QaPipeline<S, F, A>
where
    S: PageSearcher,
    F: PageFetcher,
    A: QuestionAnswerer,
{
    searcher: S,
    fetcher: F,
    answerer: A,
    language: String,
}

impl<S, F, A> QaPipeline<S, F, A>
where
    S: PageSearcher,
    F: PageFetcher,
    A: QuestionAnswerer,
{
    /// Create a new pipeline
    pub fn new(searcher: S, fetcher: F, answerer: A) -> Self {
        Self {
            searcher,
            fetcher,
            answerer,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Language edition used for source URLs
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Answer a question, returning only the extracted text
    pub fn get_response(&self, query: &str) -> Result<String> {
        self.ask(query).map(|report| report.answer)
    }

    /// Plain-text content of the top search hit for `query`
    pub fn search_wikipedia(&self, query: &str) -> Result<PageContent> {
        let query = validate_query(query)?;
        let hit = self.top_result_for(query)?;
        self.fetcher.get_page_content(&hit.title)
    }

    /// Top-ranked search hit for `query`
    pub fn top_result(&self, query: &str) -> Result<SearchResult> {
        self.top_result_for(validate_query(query)?)
    }

    /// Run the whole pipeline and keep everything it learned
    pub fn ask(&self, query: &str) -> Result<QaReport> {
        let question = validate_query(query)?;

        // Phase 1: Search
        let hit = self.top_result_for(question)?;

        // Phase 2: Fetch by title
        let page = self.fetcher.get_page_content(&hit.title)?;
        tracing::debug!(
            title = %page.title,
            page_id = page.page_id,
            chars = page.char_count(),
            "Fetched page content"
        );

        // Phase 3: Extract
        let raw = self.answerer.answer(&QaInput::new(question, &page.text))?;
        let answer = raw.answer.clone();
        let span = raw.anchored_in(&page.text).ok_or_else(|| {
            WikiqaError::malformed(
                self.answerer.model_name(),
                format!("answer '{}' is not a span of the context", answer),
            )
        })?;
        tracing::info!(score = span.score, "Extracted answer");

        Ok(QaReport {
            question: question.to_string(),
            answer: span.answer,
            score: span.score,
            start: span.start,
            end: span.end,
            model: self.answerer.model_name().to_string(),
            source: SourceReference::from_search_result(&hit, &self.language),
            context_chars: page.char_count(),
        })
    }

    fn top_result_for(&self, query: &str) -> Result<SearchResult> {
        let results = self.searcher.search(query, NUMBER_OF_RESULTS)?;
        let hit = results.into_iter().next().ok_or_else(|| WikiqaError::EmptySearchResult {
            query: query.to_string(),
        })?;

        tracing::info!(title = %hit.title, key = %hit.key, "Top search result");
        Ok(hit)
    }
}
