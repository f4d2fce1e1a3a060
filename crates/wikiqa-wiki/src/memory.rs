//! In-memory wiki for development and testing.
//!
//! The fetch log uses `RwLock::unwrap()` intentionally. Lock poisoning only
//! occurs when another thread panicked while holding the lock, which is an
//! unrecoverable state.

use std::sync::{Arc, RwLock};
use wikiqa_core::error::{Result, WikiqaError};
use wikiqa_core::models::{PageContent, SearchResult};

use crate::ports::{PageFetcher, PageSearcher};

/// A page held by [`MemoryWiki`]
#[derive(Debug, Clone)]
struct MemoryPage {
    result: SearchResult,
    content: PageContent,
}

/// In-memory implementation of both wiki ports
///
/// Search ranks pages by how many distinct query terms occur in their title
/// or text; ties keep insertion order. Every title passed to
/// [`PageFetcher::get_page_content`] is recorded.
#[derive(Debug, Clone, Default)]
pub struct MemoryWiki {
    pages: Vec<MemoryPage>,
    fetched: Arc<RwLock<Vec<String>>>,
    searched: Arc<RwLock<Vec<String>>>,
}

impl MemoryWiki {
    /// Create an empty in-memory wiki
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page; the key is derived from the title the way Wikipedia does it
    pub fn with_page(self, title: &str, text: &str) -> Self {
        let key = title.replace(' ', "_");
        self.with_result(SearchResult::new(title, key), text)
    }

    /// Add a page with a fully specified search result
    pub fn with_result(mut self, result: SearchResult, text: &str) -> Self {
        let page_id = self.pages.len() as u64 + 1;
        let content = PageContent::new(page_id, result.title.clone(), text);
        self.pages.push(MemoryPage { result, content });
        self
    }

    /// Titles requested from the fetcher, in call order
    pub fn fetched_titles(&self) -> Vec<String> {
        self.fetched.read().unwrap().clone()
    }

    /// Queries passed to the searcher, in call order
    pub fn searched_queries(&self) -> Vec<String> {
        self.searched.read().unwrap().clone()
    }

    fn relevance(page: &MemoryPage, terms: &[String]) -> usize {
        let haystack =
            format!("{} {}", page.content.title, page.content.text).to_lowercase();
        terms.iter().filter(|term| haystack.contains(term.as_str())).count()
    }
}

/// Lowercased alphanumeric terms of a query, deduplicated
fn query_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
    {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

impl PageSearcher for MemoryWiki {
    fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>> {
        self.searched.write().unwrap().push(query.to_string());

        let terms = query_terms(query);
        let mut scored: Vec<(usize, usize, &MemoryPage)> = self
            .pages
            .iter()
            .enumerate()
            .map(|(idx, page)| (Self::relevance(page, &terms), idx, page))
            .filter(|(score, _, _)| *score > 0)
            .collect();

        // Highest relevance first, then insertion order
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        Ok(scored
            .into_iter()
            .take(limit as usize)
            .map(|(_, _, page)| page.result.clone())
            .collect())
    }
}

impl PageFetcher for MemoryWiki {
    fn get_page_content(&self, title: &str) -> Result<PageContent> {
        self.fetched.write().unwrap().push(title.to_string());

        self.pages
            .iter()
            .find(|page| page.content.title == title)
            .map(|page| page.content.clone())
            .ok_or_else(|| WikiqaError::PageNotFound {
                title: title.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wiki() -> MemoryWiki {
        MemoryWiki::new()
            .with_page("Lyon", "Lyon is the third-largest city of France.")
            .with_page("Paris", "Paris is the capital of France.")
            .with_page("Berlin", "Berlin is the capital of Germany.")
    }

    #[test]
    fn test_search_ranks_by_term_overlap() {
        let results = wiki().search("What is the capital of France?", 3).unwrap();
        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles[0], "Paris");
        assert_eq!(titles.len(), 3);
    }

    #[test]
    fn test_search_respects_limit() {
        let results = wiki().search("capital", 1).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Paris");
    }

    #[test]
    fn test_search_no_match() {
        assert!(wiki().search("quantum chromodynamics", 1).unwrap().is_empty());
        assert!(MemoryWiki::new().search("anything", 1).unwrap().is_empty());
    }

    #[test]
    fn test_fetch_is_exact_title_match() {
        let wiki = wiki();
        assert_eq!(wiki.get_page_content("Paris").unwrap().text, "Paris is the capital of France.");
        assert!(matches!(
            wiki.get_page_content("paris"),
            Err(WikiqaError::PageNotFound { .. })
        ));
        assert_eq!(wiki.fetched_titles(), vec!["Paris".to_string(), "paris".to_string()]);
    }

    #[test]
    fn test_key_derived_from_title() {
        let results = MemoryWiki::new()
            .with_page("Eiffel Tower", "A wrought-iron tower in Paris.")
            .search("tower", 1)
            .unwrap();
        assert_eq!(results[0].key, "Eiffel_Tower");
    }

    #[test]
    fn test_query_terms() {
        assert_eq!(query_terms("What is, what IS?"), vec!["what".to_string(), "is".to_string()]);
    }
}
