use std::sync::Arc;

use seeder_core::Query;
use seeder_logging::seeder_debug;
use url::Url;

use crate::{decode_page, extract_absolute_links, FetchError, Fetcher, DEFAULT_MAX_LINKS};

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.google.co.uk/search";

/// Hosts serving the backend's own UI, cache, policy and support pages.
pub const DEFAULT_EXCLUDED_HOST_PREFIXES: &[&str] = &[
    "www.google.",
    "google.",
    "webcache.googleusercontent.",
    "policies.google.",
    "support.google.",
    "maps.google.",
];

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub endpoint: String,
    pub excluded_host_prefixes: Vec<String>,
    pub max_links: usize,
}

impl SearchSettings {
    pub fn endpoint_url(&self) -> Result<Url, SearchError> {
        Url::parse(&self.endpoint).map_err(|source| SearchError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            source,
        })
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            excluded_host_prefixes: DEFAULT_EXCLUDED_HOST_PREFIXES
                .iter()
                .map(|prefix| prefix.to_string())
                .collect(),
            max_links: DEFAULT_MAX_LINKS,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid search endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        source: url::ParseError,
    },
    #[error("search request failed: {0}")]
    Fetch(#[from] FetchError),
}

#[async_trait::async_trait]
pub trait SearchBackend: Send + Sync {
    /// Candidate document URLs for `query`. An empty page is `Ok(vec![])`.
    async fn search(&self, query: &Query) -> Result<Vec<Url>, SearchError>;
}

/// Search backend that scrapes the links of an HTML result page.
pub struct HtmlSearchClient {
    fetcher: Arc<dyn Fetcher>,
    settings: SearchSettings,
}

impl HtmlSearchClient {
    pub fn new(fetcher: Arc<dyn Fetcher>, settings: SearchSettings) -> Self {
        Self { fetcher, settings }
    }

    /// `<endpoint>?q=<query>`, form-urlencoded.
    pub fn query_url(&self, query: &Query) -> Result<Url, SearchError> {
        let mut url = self.settings.endpoint_url()?;
        url.query_pairs_mut().append_pair("q", query.as_str());
        Ok(url)
    }

    pub fn is_backend_owned(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        self.settings
            .excluded_host_prefixes
            .iter()
            .any(|prefix| host.starts_with(prefix.as_str()))
    }
}

#[async_trait::async_trait]
impl SearchBackend for HtmlSearchClient {
    async fn search(&self, query: &Query) -> Result<Vec<Url>, SearchError> {
        let url = self.query_url(query)?;
        let output = self.fetcher.fetch(url.as_str()).await?;
        let page = decode_page(&output.bytes, output.metadata.content_type.as_deref());
        if page.had_errors {
            seeder_debug!(
                "result page for {:?} is not clean {}; decoded lossily",
                query.as_str(),
                page.encoding
            );
        }

        let base = Url::parse(&output.metadata.final_url).ok();
        let links = extract_absolute_links(&page.text, base.as_ref(), self.settings.max_links);
        let total = links.len();
        let candidates: Vec<Url> = links
            .into_iter()
            .filter(|link| !self.is_backend_owned(link))
            .collect();

        seeder_debug!(
            "query {:?}: {} links, {} candidates",
            query.as_str(),
            total,
            candidates.len()
        );
        Ok(candidates)
    }
}
