//! factcheck - Multi-source claim verification
//!
//! Verifies a natural-language claim by gathering evidence from several
//! independent knowledge providers and asking an LLM reasoning engine for a
//! structured verdict.
//!
//! # Architecture
//!
//! The check pipeline runs in a fixed order:
//! - The claim and its accent-stripped variant are sent to every source
//!   concurrently; a failing source contributes an empty list
//! - Results are merged per source without duplicates
//! - Evidence is filtered against the entity the claim is about
//! - Evidence is formatted, wrapped in instructions and sent to the engine
//! - The reply is parsed into a [`Verdict`], falling back to an `Error`
//!   verdict if the reply is malformed
//!
//! # Modules
//!
//! - `adapters`: External system integrations (evidence providers, OpenRouter)
//! - `core`: Pipeline logic (Aggregator, Filter, Prompt, Parser, FactChecker)
//! - `domain`: Data structures (EvidenceItem, SourceBundle, Verdict)
//! - `config`: Settings resolution
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Check a claim
//! factcheck check "Karina Milei is the president of Argentina"
//!
//! # Inspect the raw evidence
//! factcheck sources "Albert Einstein was born in Germany" --json
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use adapters::{EngineError, EvidenceSource, ReasoningEngine, RetrievalError};
pub use config::{ConfigError, Settings};
pub use core::{Aggregator, FactChecker};
pub use domain::{
    CheckReport, Confidence, EvidenceItem, SourceBundle, SourceName, Verdict, VerdictKind,
};
