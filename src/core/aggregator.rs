//! Multi-source evidence retrieval.
//!
//! Every source is queried with both the claim as written and its
//! normalized variant. Each of those calls runs in its own task with a
//! timeout; a call that fails, times out or panics contributes nothing and
//! is recorded as a [`RetrievalFailure`] instead of failing the batch.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, instrument, warn};

use crate::adapters::{
    EvidenceSource, FactCheckSource, NewsSource, RetrievalError, WikidataSource, WikipediaSource,
};
use crate::config::SourceSettings;
use crate::domain::{EvidenceItem, RetrievalFailure, SourceBundle};

use super::normalize::normalize;

/// Bundle plus the calls that degraded to empty results
#[derive(Debug, Clone, Default)]
pub struct Retrieval {
    pub bundle: SourceBundle,
    pub failures: Vec<RetrievalFailure>,
}

/// Fans a query out to every evidence source and merges the results
pub struct Aggregator {
    sources: Vec<Arc<dyn EvidenceSource>>,
    timeout: Duration,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn EvidenceSource>>, timeout: Duration) -> Self {
        Self { sources, timeout }
    }

    /// The four network-backed providers, sharing one HTTP client
    pub fn from_settings(client: reqwest::Client, settings: &SourceSettings) -> Self {
        let sources: Vec<Arc<dyn EvidenceSource>> = vec![
            Arc::new(WikipediaSource::new(client.clone(), &settings.wikipedia)),
            Arc::new(NewsSource::new(client.clone(), &settings.news)),
            Arc::new(WikidataSource::new(client.clone(), &settings.wikidata)),
            Arc::new(FactCheckSource::new(client, &settings.fact_check)),
        ];
        Self::new(sources, settings.timeout)
    }

    /// Retrieve and merge evidence for a query
    pub async fn retrieve_all(&self, query: &str) -> SourceBundle {
        self.retrieve(query).await.bundle
    }

    /// Like [`Aggregator::retrieve_all`], keeping the failure record
    #[instrument(skip(self), fields(sources = self.sources.len()))]
    pub async fn retrieve(&self, query: &str) -> Retrieval {
        let normalized = normalize(query);
        debug!(%normalized, "Dispatching original and normalized queries");

        let handles: Vec<_> = self
            .sources
            .iter()
            .flat_map(|source| [(source, query.to_string()), (source, normalized.clone())])
            .map(|(source, q)| {
                let source = Arc::clone(source);
                let timeout = self.timeout;
                tokio::spawn(async move {
                    match tokio::time::timeout(timeout, source.retrieve(&q)).await {
                        Ok(result) => result,
                        Err(_) => Err(RetrievalError::Timeout(timeout)),
                    }
                })
            })
            .collect();

        let results = join_all(handles).await;

        let mut retrieval = Retrieval::default();
        let mut results = results.into_iter();

        for source in &self.sources {
            let name = source.name();
            let mut take = |q: &str| -> Vec<EvidenceItem> {
                let outcome = results
                    .next()
                    .map(|joined| joined.map_err(|e| format!("task failed: {}", e)))
                    .unwrap_or_else(|| Err("result missing".to_string()));

                match outcome {
                    Ok(Ok(items)) => items,
                    Ok(Err(e)) => {
                        warn!(source = %name, query = %q, error = %e, "Evidence source failed, continuing without it");
                        retrieval.failures.push(RetrievalFailure::new(name, q, e.to_string()));
                        Vec::new()
                    }
                    Err(reason) => {
                        warn!(source = %name, query = %q, error = %reason, "Evidence source task failed, continuing without it");
                        retrieval.failures.push(RetrievalFailure::new(name, q, reason));
                        Vec::new()
                    }
                }
            };

            let original = take(query);
            let from_normalized = take(&normalized);

            let merged = merge(original, from_normalized);
            let existing = std::mem::take(retrieval.bundle.get_mut(name));
            retrieval.bundle.set(name, merge(existing, merged));
        }

        debug!(
            items = retrieval.bundle.len(),
            failures = retrieval.failures.len(),
            "Retrieval complete"
        );
        retrieval
    }
}

/// Append items from `additional` that are not already present
///
/// Keeps `primary` in order, then every new item of `additional` in its
/// order. Duplicates are detected by value equality; the first occurrence
/// wins, so the result never holds two equal items.
pub fn merge<T: PartialEq>(primary: Vec<T>, additional: Vec<T>) -> Vec<T> {
    let mut merged = Vec::with_capacity(primary.len() + additional.len());
    for item in primary.into_iter().chain(additional) {
        if !merged.contains(&item) {
            merged.push(item);
        }
    }
    merged
}
