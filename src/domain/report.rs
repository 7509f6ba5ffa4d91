//! Full record of a single claim check.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::evidence::{SourceBundle, SourceName};
use super::verdict::Verdict;

/// A provider call that degraded to an empty result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetrievalFailure {
    pub source: String,

    /// The query variant the call was made with
    pub query: String,

    pub reason: String,
}

impl RetrievalFailure {
    pub fn new(source: SourceName, query: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source: source.as_str().to_string(),
            query: query.into(),
            reason: reason.into(),
        }
    }
}

/// Verdict plus the evidence and constraints it was rendered under
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub check_id: Uuid,
    pub checked_at: DateTime<Utc>,
    pub claim: String,

    /// Entity the evidence was filtered against
    pub entity: String,

    /// Evidence after entity filtering, as sent to the engine
    pub evidence: SourceBundle,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub retrieval_failures: Vec<RetrievalFailure>,

    /// Advisory confidence ceiling given to the engine
    pub confidence_ceiling: u8,

    pub verdict: Verdict,
}

impl CheckReport {
    /// Whether the engine ignored its confidence ceiling
    pub fn exceeds_ceiling(&self) -> bool {
        self.verdict.confidence.value() > self.confidence_ceiling
    }
}
