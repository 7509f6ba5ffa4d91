//! Adapter interfaces for external systems.
//!
//! Two capabilities are consumed by the pipeline:
//! - [`EvidenceSource`]: retrieves evidence items for a query from one
//!   knowledge provider (Wikipedia, Wikidata, a news API, a fact-check API)
//! - [`ReasoningEngine`]: turns a prompt into a single text reply
//!
//! Both are injected into the orchestrator as trait objects so tests can
//! substitute doubles for the network-backed implementations.

pub mod fact_check;
pub mod news;
pub mod openrouter;
pub mod wikidata;
pub mod wikipedia;

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::{EvidenceItem, SourceName};

pub use fact_check::FactCheckSource;
pub use news::NewsSource;
pub use openrouter::OpenRouterEngine;
pub use wikidata::WikidataSource;
pub use wikipedia::WikipediaSource;

/// Why a provider call produced no evidence
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Why the reasoning engine could not produce a reply
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("reasoning engine request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("reasoning engine returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected reasoning engine response: {0}")]
    Decode(String),

    #[error("reasoning engine returned an empty reply")]
    EmptyReply,
}

/// A knowledge provider that returns evidence for a query
#[async_trait]
pub trait EvidenceSource: Send + Sync {
    /// Bundle slot this source fills
    fn name(&self) -> SourceName;

    /// Retrieve evidence items, in provider ranking order
    async fn retrieve(&self, query: &str) -> Result<Vec<EvidenceItem>, RetrievalError>;
}

/// An opaque text-in/text-out reasoning service
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    /// Human-readable engine name
    fn name(&self) -> &str;

    /// Send a single-turn prompt and return the raw reply text
    async fn complete(&self, prompt: &str) -> Result<String, EngineError>;
}

/// Build the HTTP client shared by every provider
pub fn http_client(user_agent: &str) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(5))
        .build()
}

/// Send a request and decode a successful JSON body
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, RetrievalError> {
    let response = request.send().await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(RetrievalError::Status {
            status: status.as_u16(),
            body: truncate(&body, 200),
        });
    }

    serde_json::from_str(&body).map_err(|e| RetrievalError::Decode(e.to_string()))
}

/// Shorten provider error bodies before they reach logs
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("  short  ", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc…");
        assert_eq!(truncate("ñandú", 2), "ña…");
    }

    #[test]
    fn test_http_client_builds() {
        assert!(http_client("factcheck-test/0.1").is_ok());
    }
}
