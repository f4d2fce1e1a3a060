//! Wikimedia HTTP adapter
//!
//! Search goes through the Wikimedia core REST API; page content comes from
//! the MediaWiki action API of the configured language edition.

use crate::ports::{PageFetcher, PageSearcher};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;
use wikiqa_core::config::LayeredConfig;
use wikiqa_core::error::{Result, WikiqaError};
use wikiqa_core::models::{PageContent, SearchResult};

/// Longest response body quoted back in an error message
const ERROR_BODY_PREVIEW: usize = 200;

/// Blocking client for the Wikipedia search and extract endpoints
#[derive(Clone)]
pub struct WikimediaClient {
    /// Language edition, e.g. "en"
    language: String,

    /// Base of the core REST API, without the language segment
    search_endpoint: String,

    /// Full URL of the action API (`api.php`)
    content_endpoint: String,

    /// HTTP client carrying the identifying User-Agent
    client: reqwest::blocking::Client,
}

impl WikimediaClient {
    /// Create a new client
    ///
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(
        language: impl Into<String>,
        user_agent: &str,
        search_endpoint: impl Into<String>,
        content_endpoint: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| WikiqaError::ConfigInvalid {
                key: "user_agent".to_string(),
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            language: language.into(),
            search_endpoint: search_endpoint.into().trim_end_matches('/').to_string(),
            content_endpoint: content_endpoint.into(),
            client,
        })
    }

    /// Create from layered configuration
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        Self::new(
            config.language.value.clone(),
            &config.user_agent.value,
            config.search_endpoint.value.clone(),
            config.content_endpoint_url(),
            config.timeout(),
        )
    }

    /// `GET {search_endpoint}/{lang}/search/page?q=..&limit=..`
    pub fn search_url(&self, query: &str, limit: u32) -> Result<Url> {
        let base = format!("{}/{}/search/page", self.search_endpoint, self.language);
        let mut url = Url::parse(&base).map_err(|e| WikiqaError::ConfigInvalid {
            key: "search_endpoint".to_string(),
            reason: format!("Invalid URL '{}': {}", base, e),
        })?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    /// `GET {content_endpoint}?action=query&prop=extracts&...&titles=..`
    pub fn content_url(&self, title: &str) -> Result<Url> {
        let mut url =
            Url::parse(&self.content_endpoint).map_err(|e| WikiqaError::ConfigInvalid {
                key: "content_endpoint".to_string(),
                reason: format!("Invalid URL '{}': {}", self.content_endpoint, e),
            })?;
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("prop", "extracts")
            .append_pair("format", "json")
            .append_pair("titles", title)
            .append_pair("exlimit", "1")
            .append_key_only("explaintext");
        Ok(url)
    }

    /// Perform a GET and return the body of a successful response
    fn get_body(&self, url: Url) -> Result<(String, String)> {
        let endpoint = endpoint_label(&url);
        tracing::debug!(url = %url, "GET");

        let response = self.client.get(url).send().map_err(|e| WikiqaError::Network {
            endpoint: endpoint.clone(),
            reason: if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.to_string()
            },
        })?;

        let status = response.status();
        let body = response.text().map_err(|e| WikiqaError::Network {
            endpoint: endpoint.clone(),
            reason: format!("Failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            return Err(WikiqaError::Network {
                endpoint,
                reason: format!("HTTP {}: {}", status, preview(&body)),
            });
        }

        Ok((endpoint, body))
    }
}

impl PageSearcher for WikimediaClient {
    fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>> {
        let url = self.search_url(query, limit)?;
        let (endpoint, body) = self.get_body(url)?;
        parse_search_response(&endpoint, &body)
    }
}

impl PageFetcher for WikimediaClient {
    fn get_page_content(&self, title: &str) -> Result<PageContent> {
        let url = self.content_url(title)?;
        let (endpoint, body) = self.get_body(url)?;
        parse_extract_response(&endpoint, title, &body)
    }
}

/// Response from the core REST search endpoint
#[derive(Debug, Deserialize)]
struct SearchResponse {
    pages: Option<Vec<SearchResult>>,
}

/// Response from the action API with `prop=extracts`
#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: Option<ExtractQuery>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: BTreeMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    pageid: Option<u64>,
    title: Option<String>,
    /// Present (as an empty string) when the title does not exist
    missing: Option<serde_json::Value>,
    /// Present when the title is syntactically invalid
    invalid: Option<serde_json::Value>,
    extract: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

/// Decode a search response body
///
/// An absent `pages` array is malformed; an empty one is a valid "no hits".
pub fn parse_search_response(endpoint: &str, body: &str) -> Result<Vec<SearchResult>> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| WikiqaError::malformed(endpoint, format!("invalid JSON: {}", e)))?;

    response
        .pages
        .ok_or_else(|| WikiqaError::malformed(endpoint, "missing 'pages' array"))
}

/// Decode an extracts response body for `requested_title`
pub fn parse_extract_response(
    endpoint: &str,
    requested_title: &str,
    body: &str,
) -> Result<PageContent> {
    let response: ExtractResponse = serde_json::from_str(body)
        .map_err(|e| WikiqaError::malformed(endpoint, format!("invalid JSON: {}", e)))?;

    if let Some(error) = response.error {
        return Err(WikiqaError::malformed(
            endpoint,
            format!("API error '{}': {}", error.code, error.info),
        ));
    }

    let query = response
        .query
        .ok_or_else(|| WikiqaError::malformed(endpoint, "missing 'query' object"))?;

    let page = query
        .pages
        .into_values()
        .find(|page| page.missing.is_none() && page.invalid.is_none())
        .ok_or_else(|| WikiqaError::PageNotFound {
            title: requested_title.to_string(),
        })?;

    let page_id = page
        .pageid
        .ok_or_else(|| WikiqaError::malformed(endpoint, "page has no 'pageid'"))?;
    let text = page
        .extract
        .ok_or_else(|| WikiqaError::malformed(endpoint, "page has no 'extract'"))?;
    let title = page.title.unwrap_or_else(|| requested_title.to_string());

    Ok(PageContent::new(page_id, title, text))
}

/// URL without its query string, for error messages
fn endpoint_label(url: &Url) -> String {
    let mut label = url.clone();
    label.set_query(None);
    label.to_string()
}

fn preview(body: &str) -> String {
    let mut preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
    if body.chars().count() > ERROR_BODY_PREVIEW {
        preview.push('…');
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH: &str = "https://api.wikimedia.org/core/v1/wikipedia/en/search/page";
    const ACTION: &str = "https://en.wikipedia.org/w/api.php";

    fn client() -> WikimediaClient {
        WikimediaClient::new(
            "en",
            "wikiqa-tests/0.1",
            "https://api.wikimedia.org/core/v1/wikipedia/",
            ACTION,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_search_url() {
        let url = client().search_url("What is the capital of France?", 1).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.wikimedia.org/core/v1/wikipedia/en/search/page?q=What+is+the+capital+of+France%3F&limit=1"
        );
    }

    #[test]
    fn test_content_url_encodes_title() {
        let url = client().content_url("Café de Flore").unwrap();
        assert_eq!(
            url.as_str(),
            "https://en.wikipedia.org/w/api.php?action=query&prop=extracts&format=json&titles=Caf%C3%A9+de+Flore&exlimit=1&explaintext"
        );

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("titles".to_string(), "Café de Flore".to_string())));
    }

    #[test]
    fn test_content_url_escapes_reserved_characters() {
        let url = client().content_url("AT&T").unwrap();
        assert!(url.as_str().contains("titles=AT%26T"));
        let titles: Vec<String> = url
            .query_pairs()
            .filter(|(k, _)| k == "titles")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(titles, vec!["AT&T".to_string()]);
    }

    #[test]
    fn test_invalid_endpoint_is_config_error() {
        let client = WikimediaClient::new("en", "ua", "not a url", "also not", None).unwrap();
        assert!(matches!(
            client.search_url("q", 1),
            Err(WikiqaError::ConfigInvalid { ref key, .. }) if key == "search_endpoint"
        ));
        assert!(matches!(
            client.content_url("Paris"),
            Err(WikiqaError::ConfigInvalid { ref key, .. }) if key == "content_endpoint"
        ));
    }

    #[test]
    fn test_parse_search_response() {
        let body = r#"{"pages":[{"id":22989,"key":"Paris","title":"Paris","excerpt":"<span>Paris</span>","description":"Capital of France","thumbnail":null}]}"#;
        let results = parse_search_response(SEARCH, body).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Paris");
        assert_eq!(results[0].key, "Paris");
        assert_eq!(results[0].description.as_deref(), Some("Capital of France"));
    }

    #[test]
    fn test_parse_search_response_empty_and_absent() {
        assert!(parse_search_response(SEARCH, r#"{"pages":[]}"#).unwrap().is_empty());

        let err = parse_search_response(SEARCH, r#"{"httpCode":400}"#).unwrap_err();
        assert!(matches!(err, WikiqaError::MalformedResponse { .. }));

        let err = parse_search_response(SEARCH, "<html>").unwrap_err();
        assert!(matches!(err, WikiqaError::MalformedResponse { .. }));
    }

    #[test]
    fn test_parse_extract_response() {
        let body = r#"{"batchcomplete":"","query":{"pages":{"22989":{"pageid":22989,"ns":0,"title":"Paris","extract":"Paris is the capital and largest city of France."}}}}"#;
        let page = parse_extract_response(ACTION, "Paris", body).unwrap();
        assert_eq!(page.page_id, 22989);
        assert_eq!(page.title, "Paris");
        assert!(page.text.starts_with("Paris is the capital"));
    }

    #[test]
    fn test_parse_extract_response_missing_page() {
        let body = r#"{"batchcomplete":"","query":{"pages":{"-1":{"ns":0,"title":"Xyzzy Plugh","missing":""}}}}"#;
        let err = parse_extract_response(ACTION, "Xyzzy Plugh", body).unwrap_err();
        assert!(matches!(err, WikiqaError::PageNotFound { ref title } if title == "Xyzzy Plugh"));
    }

    #[test]
    fn test_parse_extract_response_invalid_title() {
        let body = r#"{"query":{"pages":{"-1":{"title":"<>","invalidreason":"The requested page title contains invalid characters","invalid":""}}}}"#;
        let err = parse_extract_response(ACTION, "<>", body).unwrap_err();
        assert!(err.is_no_result());
    }

    #[test]
    fn test_parse_extract_response_no_pages() {
        let err = parse_extract_response(ACTION, "Paris", r#"{"query":{}}"#).unwrap_err();
        assert!(matches!(err, WikiqaError::PageNotFound { .. }));
    }

    #[test]
    fn test_parse_extract_response_malformed() {
        let err = parse_extract_response(ACTION, "Paris", r#"{"batchcomplete":""}"#).unwrap_err();
        assert!(matches!(err, WikiqaError::MalformedResponse { .. }));

        let body = r#"{"query":{"pages":{"22989":{"pageid":22989,"title":"Paris"}}}}"#;
        let err = parse_extract_response(ACTION, "Paris", body).unwrap_err();
        assert!(matches!(
            err,
            WikiqaError::MalformedResponse { ref reason, .. } if reason.contains("extract")
        ));

        let body = r#"{"error":{"code":"badvalue","info":"Unrecognized value for 'action'"}}"#;
        let err = parse_extract_response(ACTION, "Paris", body).unwrap_err();
        assert!(matches!(
            err,
            WikiqaError::MalformedResponse { ref reason, .. } if reason.contains("badvalue")
        ));
    }

    #[test]
    fn test_endpoint_label_strips_query() {
        let url = Url::parse("https://en.wikipedia.org/w/api.php?titles=Paris").unwrap();
        assert_eq!(endpoint_label(&url), ACTION);
    }
}
