use serde::{Deserialize, Serialize};

/// A ranked candidate page returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Display title; the content endpoint is keyed by this exact string
    pub title: String,

    /// URL slug of the article
    pub key: String,

    /// Short description (null for many pages)
    #[serde(default)]
    pub description: Option<String>,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            key: key.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Canonical article URL on the given language edition
    pub fn article_url(&self, language: &str) -> String {
        format!("https://{}.wikipedia.org/wiki/{}", language, self.key)
    }
}

/// Plain-text extract of a single Wikipedia article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    /// MediaWiki page id
    pub page_id: u64,

    /// Title as reported by the content endpoint
    ///
    /// May differ from the requested title after normalization.
    pub title: String,

    /// Full article body, untruncated
    pub text: String,
}

impl PageContent {
    pub fn new(page_id: u64, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            page_id,
            title: title.into(),
            text: text.into(),
        }
    }

    /// Length of the extract in characters
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_url_uses_key_and_language() {
        let result = SearchResult::new("Eiffel Tower", "Eiffel_Tower");
        assert_eq!(result.article_url("en"), "https://en.wikipedia.org/wiki/Eiffel_Tower");
        assert_eq!(result.article_url("fr"), "https://fr.wikipedia.org/wiki/Eiffel_Tower");
    }

    #[test]
    fn test_search_result_null_description() {
        let result: SearchResult =
            serde_json::from_str(r#"{"title":"Paris","key":"Paris","description":null}"#).unwrap();
        assert_eq!(result.description, None);

        let result: SearchResult =
            serde_json::from_str(r#"{"title":"Paris","key":"Paris"}"#).unwrap();
        assert_eq!(result.description, None);
    }

    #[test]
    fn test_char_count_counts_scalars_not_bytes() {
        let page = PageContent::new(1, "Zürich", "Zürich");
        assert_eq!(page.char_count(), 6);
        assert_eq!(page.text.len(), 7);
    }
}
