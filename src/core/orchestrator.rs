//! Claim-check orchestration.
//!
//! Composes retrieval, entity filtering, formatting, prompting, the
//! engine call and verdict parsing. Only the engine call can fail a check;
//! provider outages and malformed replies degrade into the result instead.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn, Span};
use uuid::Uuid;

use crate::adapters::{http_client, EngineError, OpenRouterEngine, ReasoningEngine};
use crate::config::{ConfigError, Settings};
use crate::domain::{CheckReport, RetrievalFailure, SourceBundle, Verdict};

use super::aggregator::Aggregator;
use super::filter::filter_by_entity;
use super::formatter::evidence_block;
use super::parser::parse_verdict;
use super::prompt::{build_prompt, confidence_ceiling};

/// Everything gathered for a claim up to the engine call
#[derive(Debug, Clone)]
pub struct PreparedCheck {
    pub claim: String,
    pub entity: String,
    /// Evidence after entity filtering
    pub evidence: SourceBundle,
    pub failures: Vec<RetrievalFailure>,
    pub confidence_ceiling: u8,
    pub prompt: String,
}

/// Main claim-check orchestrator
pub struct FactChecker {
    aggregator: Aggregator,
    engine: Arc<dyn ReasoningEngine>,
}

/// Entity used for filtering: the hint if it has any text, else the claim
pub fn resolve_entity(claim: &str, entity_hint: Option<&str>) -> String {
    match entity_hint {
        Some(hint) if !hint.trim().is_empty() => hint.to_string(),
        Some(_) => {
            debug!("Blank entity hint, using claim text");
            claim.to_string()
        }
        None => claim.to_string(),
    }
}

/// Retrieve, filter and format evidence, then build the prompt
///
/// Needs no reasoning engine, so it also backs prompt previews.
pub async fn prepare_check(
    aggregator: &Aggregator,
    claim: &str,
    entity_hint: Option<&str>,
) -> PreparedCheck {
    let entity = resolve_entity(claim, entity_hint);

    let retrieval = aggregator.retrieve(claim).await;
    let evidence = filter_by_entity(&retrieval.bundle, &entity);
    debug!(
        retrieved = retrieval.bundle.len(),
        kept = evidence.len(),
        %entity,
        "Filtered evidence by entity"
    );

    let ceiling = confidence_ceiling(&evidence);
    let prompt = build_prompt(claim, &evidence_block(&evidence), ceiling);

    PreparedCheck {
        claim: claim.to_string(),
        entity,
        evidence,
        failures: retrieval.failures,
        confidence_ceiling: ceiling,
        prompt,
    }
}

impl FactChecker {
    pub fn new(aggregator: Aggregator, engine: Arc<dyn ReasoningEngine>) -> Self {
        Self { aggregator, engine }
    }

    /// Wire the network-backed sources and engine from resolved settings
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        settings.require_credentials()?;

        let client = http_client(&settings.sources.user_agent)
            .map_err(|e| ConfigError::Invalid(format!("HTTP client: {}", e)))?;

        let aggregator = Aggregator::from_settings(client.clone(), &settings.sources);
        let engine = OpenRouterEngine::new(client, &settings.engine)?;

        Ok(Self::new(aggregator, Arc::new(engine)))
    }

    /// Unfiltered evidence for a claim, from every source
    pub async fn retrieve_all_sources(&self, claim: &str) -> SourceBundle {
        self.aggregator.retrieve_all(claim).await
    }

    /// Verify a claim and return the engine's verdict
    pub async fn analyze_claim(
        &self,
        claim: &str,
        entity_hint: Option<&str>,
    ) -> Result<Verdict, EngineError> {
        Ok(self.analyze_claim_report(claim, entity_hint).await?.verdict)
    }

    /// Run the pipeline up to, but not including, the engine call
    pub async fn prepare_prompt(&self, claim: &str, entity_hint: Option<&str>) -> PreparedCheck {
        prepare_check(&self.aggregator, claim, entity_hint).await
    }

    /// Verify a claim and return the verdict with the evidence behind it
    #[instrument(skip(self, entity_hint), fields(check_id = tracing::field::Empty))]
    pub async fn analyze_claim_report(
        &self,
        claim: &str,
        entity_hint: Option<&str>,
    ) -> Result<CheckReport, EngineError> {
        let check_id = Uuid::new_v4();
        Span::current().record("check_id", tracing::field::display(check_id));
        info!("Starting claim check");

        let prepared = self.prepare_prompt(claim, entity_hint).await;

        let raw = self.engine.complete(&prepared.prompt).await.map_err(|e| {
            warn!(engine = %self.engine.name(), error = %e, "Reasoning engine call failed");
            e
        })?;

        let verdict = parse_verdict(&raw);

        let report = CheckReport {
            check_id,
            checked_at: Utc::now(),
            claim: prepared.claim,
            entity: prepared.entity,
            evidence: prepared.evidence,
            retrieval_failures: prepared.failures,
            confidence_ceiling: prepared.confidence_ceiling,
            verdict,
        };

        if report.exceeds_ceiling() {
            warn!(
                confidence = report.verdict.confidence.value(),
                ceiling = report.confidence_ceiling,
                "Engine confidence exceeds advisory ceiling"
            );
        }

        info!(verdict = %report.verdict.verdict, confidence = %report.verdict.confidence, "Claim check complete");
        Ok(report)
    }
}
