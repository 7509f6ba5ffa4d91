//! Core claim-verification logic.
//!
//! This module contains:
//! - Normalize: Accent-stripped query variant
//! - Aggregator: Concurrent, fail-open retrieval and merge
//! - Filter: Entity relevance filtering
//! - Formatter: Evidence rendering
//! - Prompt: Engine instructions and output contract
//! - Parser: Verdict extraction with fallback
//! - Orchestrator: The public check operations

pub mod aggregator;
pub mod filter;
pub mod formatter;
pub mod normalize;
pub mod orchestrator;
pub mod parser;
pub mod prompt;

// Re-export commonly used types
pub use aggregator::{merge, Aggregator, Retrieval};
pub use filter::filter_by_entity;
pub use formatter::{evidence_block, format_evidence};
pub use normalize::normalize;
pub use orchestrator::{prepare_check, resolve_entity, FactChecker, PreparedCheck};
pub use parser::{parse_verdict, try_parse_verdict, VerdictParseError};
pub use prompt::{build_prompt, confidence_ceiling, output_schema};
