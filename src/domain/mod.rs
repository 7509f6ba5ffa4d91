//! Domain types for claim verification.
//!
//! This module contains the core data structures:
//! - Evidence: Items retrieved from each knowledge provider, grouped per source
//! - Verdict: The structured outcome rendered by the reasoning engine
//! - Report: A verdict together with the evidence that produced it

pub mod evidence;
pub mod report;
pub mod verdict;

// Re-export commonly used types
pub use evidence::{DisplayForm, EvidenceItem, SourceBundle, SourceName};
pub use report::{CheckReport, RetrievalFailure};
pub use verdict::{Confidence, ConfidenceError, Verdict, VerdictKind};
