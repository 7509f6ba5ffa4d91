//! Professional fact-check records from the Google Fact Check Tools API.
//!
//! Claim records are passed through untouched; formatting decides how
//! much of each record the reasoning engine sees.

use async_trait::async_trait;
use serde::Deserialize;

use super::{fetch_json, EvidenceSource, RetrievalError};
use crate::config::EndpointSettings;
use crate::domain::{EvidenceItem, SourceName};

pub struct FactCheckSource {
    client: reqwest::Client,
    endpoint: String,
    limit: usize,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ClaimSearchResponse {
    #[serde(default)]
    claims: Vec<serde_json::Value>,
}

impl FactCheckSource {
    pub fn new(client: reqwest::Client, settings: &EndpointSettings) -> Self {
        Self {
            client,
            endpoint: settings.endpoint.clone(),
            limit: settings.limit,
            api_key: settings.api_key.clone().unwrap_or_default(),
        }
    }
}

#[async_trait]
impl EvidenceSource for FactCheckSource {
    fn name(&self) -> SourceName {
        SourceName::GoogleFactCheck
    }

    async fn retrieve(&self, query: &str) -> Result<Vec<EvidenceItem>, RetrievalError> {
        let page_size = self.limit.to_string();
        let request = self.client.get(&self.endpoint).query(&[
            ("query", query),
            ("pageSize", page_size.as_str()),
            ("key", self.api_key.as_str()),
        ]);

        let response: ClaimSearchResponse = fetch_json(request).await?;
        Ok(response
            .claims
            .into_iter()
            .map(EvidenceItem::FactCheckClaim)
            .collect())
    }
}
