//! Wikipedia page summaries via the MediaWiki action API.
//!
//! Retrieval is two-phase: a full-text title search, then one page query
//! per title for the intro extract and canonical URL. Disambiguation and
//! missing pages are skipped; any other per-page failure is logged and
//! skipped so the remaining titles still contribute.

use async_trait::async_trait;
use futures_util::future::join_all;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{fetch_json, EvidenceSource, RetrievalError};
use crate::config::EndpointSettings;
use crate::domain::{EvidenceItem, SourceName};

pub struct WikipediaSource {
    client: reqwest::Client,
    endpoint: String,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    #[serde(default)]
    query: Option<PageQuery>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    fullurl: Option<String>,
    #[serde(default)]
    pageprops: Option<PageProps>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(default)]
    disambiguation: Option<serde_json::Value>,
}

/// Result of looking up a single search title
#[derive(Debug, PartialEq)]
enum PageOutcome {
    Found(EvidenceItem),
    Missing,
    Disambiguation,
}

impl WikipediaSource {
    pub fn new(client: reqwest::Client, settings: &EndpointSettings) -> Self {
        Self {
            client,
            endpoint: settings.endpoint.clone(),
            limit: settings.limit,
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, RetrievalError> {
        let limit = self.limit.to_string();
        let request = self.client.get(&self.endpoint).query(&[
            ("action", "query"),
            ("list", "search"),
            ("srsearch", query),
            ("srlimit", limit.as_str()),
            ("srprop", ""),
            ("format", "json"),
            ("formatversion", "2"),
        ]);

        let response: SearchResponse = fetch_json(request).await?;
        parse_search(response)
    }

    async fn fetch_page(&self, title: &str) -> Result<PageOutcome, RetrievalError> {
        let request = self.client.get(&self.endpoint).query(&[
            ("action", "query"),
            ("prop", "extracts|info|pageprops"),
            ("exintro", "1"),
            ("explaintext", "1"),
            ("inprop", "url"),
            ("ppprop", "disambiguation"),
            ("redirects", "1"),
            ("titles", title),
            ("format", "json"),
            ("formatversion", "2"),
        ]);

        let response: PageResponse = fetch_json(request).await?;
        parse_page(title, response)
    }
}

fn parse_search(response: SearchResponse) -> Result<Vec<String>, RetrievalError> {
    if let Some(err) = response.error {
        return Err(RetrievalError::Decode(format!("{}: {}", err.code, err.info)));
    }

    Ok(response
        .query
        .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
        .unwrap_or_default())
}

/// The item keeps the search title, not the redirect target
fn parse_page(title: &str, response: PageResponse) -> Result<PageOutcome, RetrievalError> {
    if let Some(err) = response.error {
        return Err(RetrievalError::Decode(format!("{}: {}", err.code, err.info)));
    }

    let page = match response.query.and_then(|q| q.pages.into_iter().next()) {
        Some(page) => page,
        None => return Ok(PageOutcome::Missing),
    };

    if page.missing || page.invalid {
        return Ok(PageOutcome::Missing);
    }

    if page
        .pageprops
        .as_ref()
        .is_some_and(|props| props.disambiguation.is_some())
    {
        return Ok(PageOutcome::Disambiguation);
    }

    Ok(PageOutcome::Found(EvidenceItem::WikiSummary {
        title: title.to_string(),
        summary: page.extract.unwrap_or_default().trim().to_string(),
        url: page.fullurl.unwrap_or_default(),
    }))
}

#[async_trait]
impl EvidenceSource for WikipediaSource {
    fn name(&self) -> SourceName {
        SourceName::Wikipedia
    }

    async fn retrieve(&self, query: &str) -> Result<Vec<EvidenceItem>, RetrievalError> {
        let titles = self.search(query).await?;

        let outcomes = join_all(titles.iter().map(|title| self.fetch_page(title))).await;

        let mut items = Vec::with_capacity(titles.len());
        for (title, outcome) in titles.iter().zip(outcomes) {
            match outcome {
                Ok(PageOutcome::Found(item)) => items.push(item),
                Ok(PageOutcome::Missing) => debug!(%title, "Skipping missing page"),
                Ok(PageOutcome::Disambiguation) => {
                    debug!(%title, "Skipping disambiguation page")
                }
                Err(e) => warn!(%title, error = %e, "Failed to fetch Wikipedia page"),
            }
        }

        Ok(items)
    }
}
