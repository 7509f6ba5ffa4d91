//! Prompt construction for the reasoning engine.
//!
//! The output contract at the end of the prompt is rendered from
//! [`Verdict::FIELDS`] and [`VerdictKind::ENGINE_CHOICES`], the same types
//! the parser deserializes the reply into.

use crate::domain::{SourceBundle, SourceName, Verdict, VerdictKind};

/// Ceiling when no encyclopedia evidence about the entity survived filtering
pub const RESTRICTED_CONFIDENCE: u8 = 50;

/// Ceiling when encyclopedia evidence is available
pub const FULL_CONFIDENCE: u8 = 100;

/// Advisory confidence ceiling for a filtered bundle
pub fn confidence_ceiling(bundle: &SourceBundle) -> u8 {
    if bundle.get(SourceName::Wikipedia).is_empty() {
        RESTRICTED_CONFIDENCE
    } else {
        FULL_CONFIDENCE
    }
}

fn field_hint(field: &str) -> String {
    match field {
        "verdict" => {
            let choices: Vec<&str> = VerdictKind::ENGINE_CHOICES
                .iter()
                .map(VerdictKind::as_str)
                .collect();
            format!("\"{}\"", choices.join(" | "))
        }
        "explanation" => "\"Short explanation why\"".to_string(),
        "follow_up" => "\"If refuted, provide the correct information\"".to_string(),
        "source_titles" => "[\"List of sources used\"]".to_string(),
        "confidence" => "\"0-100\"".to_string(),
        other => format!("\"{}\"", other),
    }
}

/// The JSON object shape the engine must reply with
pub fn output_schema() -> String {
    let lines: Vec<String> = Verdict::FIELDS
        .iter()
        .map(|field| format!("    \"{}\": {}", field, field_hint(field)))
        .collect();
    format!("{{\n{}\n}}", lines.join(",\n"))
}

/// Assemble the full instruction payload
pub fn build_prompt(claim: &str, evidence_block: &str, max_confidence: u8) -> String {
    format!(
        r#"You are a fact-checking assistant. Decide whether the claim below is true or false using only the evidence provided.

Claim: "{claim}"

Evidence comes from several sources: Wikipedia, Wikidata, News, and Google Fact Check.

Rules:
- Google Fact Check results are the most reliable evidence. Give them priority whenever they are present.
- When Google Fact Check contradicts another source, follow Google Fact Check.
- When the claim mentions a partial name or a surname, match it against Wikipedia using the full name (for example "Einstein" means "Albert Einstein").
- Supported: use only when the evidence confirms the exact same subject (person, place, or object) AND the exact role, title, or fact stated in the claim. Restate the confirming evidence.
- Refuted: use when the evidence contradicts the claim, and state the correct fact. A partial overlap is not support: if the claim says Karina Milei is President but the evidence says Javier Milei is President, the claim is Refuted.
- If the evidence shows a relative, colleague, or related organization holding the claimed role instead of the subject itself, classify the claim as Refuted.
- Not Enough Info: use when no clear evidence exists, and say that the evidence is insufficient.
- Ignore matches that are not directly connected to the claim.
- Always check subject consistency: the same person or entity from the claim must appear in the evidence with the same role.
- Keep the explanation short and limited to evidence relevant to the claim.
- Confidence must not exceed {max_confidence}.

Evidence:
{evidence_block}

Respond ONLY with a single JSON object in exactly this format:
{schema}
"#,
        claim = claim,
        evidence_block = evidence_block,
        max_confidence = max_confidence,
        schema = output_schema(),
    )
}
