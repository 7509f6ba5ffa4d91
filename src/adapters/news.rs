//! Headlines from the NewsAPI `everything` endpoint.

use async_trait::async_trait;
use serde::Deserialize;

use super::{fetch_json, EvidenceSource, RetrievalError};
use crate::config::EndpointSettings;
use crate::domain::{EvidenceItem, SourceName};

pub struct NewsSource {
    client: reqwest::Client,
    endpoint: String,
    limit: usize,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    description: Option<String>,
}

impl NewsSource {
    pub fn new(client: reqwest::Client, settings: &EndpointSettings) -> Self {
        Self {
            client,
            endpoint: settings.endpoint.clone(),
            limit: settings.limit,
            api_key: settings.api_key.clone().unwrap_or_default(),
        }
    }
}

/// Top articles as `"title: description"` strings
fn headlines(response: NewsResponse, limit: usize) -> Vec<EvidenceItem> {
    response
        .articles
        .into_iter()
        .take(limit)
        .map(|a| {
            EvidenceItem::NewsArticle(format!(
                "{}: {}",
                a.title.unwrap_or_default(),
                a.description.unwrap_or_default()
            ))
        })
        .collect()
}

#[async_trait]
impl EvidenceSource for NewsSource {
    fn name(&self) -> SourceName {
        SourceName::News
    }

    async fn retrieve(&self, query: &str) -> Result<Vec<EvidenceItem>, RetrievalError> {
        let request = self.client.get(&self.endpoint).query(&[
            ("q", query),
            ("language", "en"),
            ("apiKey", self.api_key.as_str()),
        ]);

        let response: NewsResponse = fetch_json(request).await?;
        Ok(headlines(response, self.limit))
    }
}
