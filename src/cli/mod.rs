//! Command-line interface for factcheck.
//!
//! Provides commands for checking a claim, inspecting the evidence the
//! sources return for it, and showing the resolved configuration.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::{http_client, truncate};
use crate::config::{mask_credential, Settings};
use crate::core::{prepare_check, Aggregator, FactChecker};
use crate::domain::{CheckReport, DisplayForm, EvidenceItem, RetrievalFailure, SourceBundle};

/// factcheck - Verify claims against live knowledge sources
#[derive(Parser, Debug)]
#[command(name = "factcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a factual claim
    Check {
        /// The claim to verify
        claim: String,

        /// Entity the claim is about (defaults to the claim text)
        #[arg(short, long)]
        entity: Option<String>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        /// Print the prompt instead of calling the reasoning engine
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the unfiltered evidence every source returns for a claim
    Sources {
        /// The claim to search for
        claim: String,

        /// Print the bundle as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Check {
                claim,
                entity,
                json,
                dry_run,
            } => {
                if dry_run {
                    preview_prompt(&claim, entity.as_deref()).await
                } else {
                    check_claim(&claim, entity.as_deref(), json).await
                }
            }
            Commands::Sources { claim, json } => show_sources(&claim, json).await,
            Commands::Config => show_config(),
        }
    }
}

fn load_settings() -> Result<Settings> {
    Settings::load().context("Failed to load configuration")
}

fn source_aggregator(settings: &Settings) -> Result<Aggregator> {
    settings
        .require_source_credentials()
        .context("Evidence sources are not configured")?;
    let client =
        http_client(&settings.sources.user_agent).context("Failed to build HTTP client")?;
    Ok(Aggregator::from_settings(client, &settings.sources))
}

fn validate_claim(claim: &str) -> Result<()> {
    if claim.trim().is_empty() {
        anyhow::bail!("Claim is empty");
    }
    Ok(())
}

/// Run a full check and print the verdict
async fn check_claim(claim: &str, entity: Option<&str>, json: bool) -> Result<()> {
    validate_claim(claim)?;

    let settings = load_settings()?;
    let checker = FactChecker::from_settings(&settings).context("Reasoning engine is not configured")?;

    let report = checker
        .analyze_claim_report(claim, entity)
        .await
        .context("Claim check failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Print the prompt that would be sent to the engine
async fn preview_prompt(claim: &str, entity: Option<&str>) -> Result<()> {
    validate_claim(claim)?;

    let settings = load_settings()?;
    let aggregator = source_aggregator(&settings)?;

    let prepared = prepare_check(&aggregator, claim, entity).await;
    print_failures(&prepared.failures);
    println!("{}", prepared.prompt);

    Ok(())
}

/// Print every source's evidence without entity filtering
async fn show_sources(claim: &str, json: bool) -> Result<()> {
    validate_claim(claim)?;

    let settings = load_settings()?;
    let aggregator = source_aggregator(&settings)?;

    let retrieval = aggregator.retrieve(claim).await;
    print_failures(&retrieval.failures);

    if json {
        println!("{}", serde_json::to_string_pretty(&retrieval.bundle)?);
    } else {
        print_bundle(&retrieval.bundle);
    }

    Ok(())
}

fn print_report(report: &CheckReport) {
    let verdict = &report.verdict;

    println!("Verdict:     {}", verdict.verdict);
    println!("Explanation: {}", verdict.explanation);
    println!("Confidence:  {}", verdict.confidence);
    if !verdict.follow_up.trim().is_empty() {
        println!("Follow-up:   {}", verdict.follow_up);
    }
    if !verdict.source_titles.is_empty() {
        println!("Cited:       {}", verdict.source_titles.join(", "));
    }

    println!();
    println!("Sources used:");
    print_bundle(&report.evidence);

    print_failures(&report.retrieval_failures);
    eprintln!("\n[Check {} completed]", report.check_id);
}

fn item_line(item: &EvidenceItem) -> String {
    match (item, item.display_form()) {
        (EvidenceItem::WikiSummary { url, .. }, DisplayForm::Structured { title, .. }) => {
            format!("{} ({})", title, url)
        }
        (_, DisplayForm::Structured { title, summary }) if summary.is_empty() => title,
        (_, DisplayForm::Structured { title, summary }) => format!("{} [{}]", title, summary),
        (_, DisplayForm::Scalar(text)) => truncate(&text, 160),
    }
}

fn print_bundle(bundle: &SourceBundle) {
    for (source, items) in bundle.iter() {
        println!("  {} ({})", source, items.len());
        for item in items {
            println!("    - {}", item_line(item));
        }
    }
}

fn print_failures(failures: &[RetrievalFailure]) {
    for failure in failures {
        eprintln!(
            "[warn] {} unavailable for {:?}: {}",
            failure.source, failure.query, failure.reason
        );
    }
}

/// Show resolved configuration
fn show_config() -> Result<()> {
    let settings = load_settings()?;

    println!("factcheck configuration");
    println!();
    println!(
        "Config file: {}",
        settings
            .config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Reasoning engine:");
    println!("  Endpoint:    {}", settings.engine.base_url);
    println!("  Model:       {}", settings.engine.model);
    println!("  Temperature: {}", settings.engine.temperature);
    println!("  Timeout:     {}s", settings.engine.timeout.as_secs());
    println!("  API key:     {}", mask_credential(&settings.engine.api_key));
    println!();
    println!("Evidence sources (timeout {}s):", settings.sources.timeout.as_secs());
    for (name, endpoint) in [
        ("Wikipedia", &settings.sources.wikipedia),
        ("Wikidata", &settings.sources.wikidata),
        ("News", &settings.sources.news),
        ("Fact check", &settings.sources.fact_check),
    ] {
        println!(
            "  {:<11} {} (limit {}, key {})",
            name,
            endpoint.endpoint,
            endpoint.limit,
            mask_credential(&endpoint.api_key)
        );
    }
    println!("  User agent: {}", settings.sources.user_agent);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_command() {
        let cli = Cli::parse_from([
            "factcheck",
            "check",
            "Einstein was born in Germany",
            "--entity",
            "Albert Einstein",
            "--json",
        ]);
        match cli.command {
            Commands::Check {
                claim,
                entity,
                json,
                dry_run,
            } => {
                assert_eq!(claim, "Einstein was born in Germany");
                assert_eq!(entity.as_deref(), Some("Albert Einstein"));
                assert!(json);
                assert!(!dry_run);
            }
            other => panic!("Expected check command, got {:?}", other),
        }
    }

    #[test]
    fn test_item_lines() {
        let wiki = EvidenceItem::WikiSummary {
            title: "Albert Einstein".into(),
            summary: "Physicist".into(),
            url: "https://en.wikipedia.org/wiki/Albert_Einstein".into(),
        };
        assert_eq!(
            item_line(&wiki),
            "Albert Einstein (https://en.wikipedia.org/wiki/Albert_Einstein)"
        );

        let claim = EvidenceItem::FactCheckClaim(json!({
            "text": "Einstein failed math",
            "claimReview": [{"publisher": {"name": "Snopes"}, "textualRating": "False"}]
        }));
        assert_eq!(item_line(&claim), "Einstein failed math [Snopes: False]");
    }

    #[test]
    fn test_empty_claim_rejected() {
        assert!(validate_claim("   ").is_err());
        assert!(validate_claim("The sky is blue").is_ok());
    }
}
