use wikiqa_core::error::Result;
use wikiqa_core::models::{PageContent, SearchResult};

/// Port for free-text page search
pub trait PageSearcher {
    /// Search for pages matching `query`
    ///
    /// Returns at most `limit` results, best match first. An empty vector
    /// means the search ran and matched nothing.
    fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>>;
}

/// Port for reading the plain-text content of a page
pub trait PageFetcher {
    /// Fetch the full extract of the page with this exact title
    ///
    /// Fails with `PageNotFound` when the title does not resolve to a page.
    fn get_page_content(&self, title: &str) -> Result<PageContent>;
}

impl<T: PageSearcher + ?Sized> PageSearcher for &T {
    fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>> {
        (**self).search(query, limit)
    }
}

impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    fn get_page_content(&self, title: &str) -> Result<PageContent> {
        (**self).get_page_content(title)
    }
}
