//! Verdict extraction from raw engine replies.
//!
//! Engines wrap the requested JSON object in prose or code fences, so the
//! parser takes the span from the first `{` to the last `}` and decodes
//! that against the [`Verdict`] schema.

use thiserror::Error;
use tracing::warn;

use crate::domain::Verdict;

#[derive(Debug, Error)]
pub enum VerdictParseError {
    #[error("no JSON object found in reply")]
    NoObject,

    #[error("reply object does not match the verdict schema: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Span from the first `{` through the last `}`, if any
pub fn extract_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

/// Strict parse: fails if the reply holds no valid verdict object
pub fn try_parse_verdict(raw: &str) -> Result<Verdict, VerdictParseError> {
    let object = extract_object(raw).ok_or(VerdictParseError::NoObject)?;
    Ok(serde_json::from_str(object)?)
}

/// Parse a reply, falling back to an `Error` verdict that embeds the raw text
pub fn parse_verdict(raw: &str) -> Verdict {
    match try_parse_verdict(raw) {
        Ok(verdict) => verdict,
        Err(e) => {
            warn!(error = %e, "Unparseable reasoning engine reply");
            Verdict::fallback(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Confidence, VerdictKind};

    #[test]
    fn test_no_braces_falls_back() {
        let verdict = parse_verdict("I am unable to verify this claim.");
        assert_eq!(verdict.verdict, VerdictKind::Error);
        assert_eq!(verdict.confidence, Confidence::zero());
        assert!(verdict.explanation.contains("I am unable to verify this claim."));
        assert!(verdict.source_titles.is_empty());
        assert!(verdict.follow_up.is_empty());
    }

    #[test]
    fn test_embedded_object_extracted() {
        let raw = r#"noise {"verdict":"Supported","explanation":"x","follow_up":"","source_titles":[],"confidence":"80"} trailing"#;
        let verdict = parse_verdict(raw);
        assert_eq!(verdict.verdict, VerdictKind::Supported);
        assert_eq!(verdict.explanation, "x");
        assert_eq!(verdict.follow_up, "");
        assert!(verdict.source_titles.is_empty());
        assert_eq!(verdict.confidence.value(), 80);
    }

    #[test]
    fn test_code_fenced_reply() {
        let raw = "```json\n{\n  \"verdict\": \"Not Enough Info\",\n  \"explanation\": \"No evidence\",\n  \"follow_up\": \"\",\n  \"source_titles\": [\"News\"],\n  \"confidence\": 30\n}\n```";
        let verdict = parse_verdict(raw);
        assert_eq!(verdict.verdict, VerdictKind::NotEnoughInfo);
        assert_eq!(verdict.source_titles, vec!["News".to_string()]);
        assert_eq!(verdict.confidence.value(), 30);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        let raw = r#"{"verdict": "Supported", "explanation": }"#;
        let verdict = parse_verdict(raw);
        assert_eq!(verdict.verdict, VerdictKind::Error);
        assert!(verdict.explanation.contains(raw));
    }

    #[test]
    fn test_unknown_verdict_falls_back() {
        let raw = r#"{"verdict":"Supported | Refuted | Not Enough Info","explanation":"?","follow_up":"","source_titles":[],"confidence":"0-100"}"#;
        assert!(matches!(
            try_parse_verdict(raw),
            Err(VerdictParseError::Schema(_))
        ));
        assert_eq!(parse_verdict(raw).verdict, VerdictKind::Error);
    }

    #[test]
    fn test_reversed_braces() {
        assert!(extract_object("} before {").is_none());
        assert!(matches!(
            try_parse_verdict("} before {"),
            Err(VerdictParseError::NoObject)
        ));
    }

    #[test]
    fn test_well_formed_reply_round_trips() {
        for kind in VerdictKind::ENGINE_CHOICES {
            let verdict = Verdict {
                verdict: kind,
                explanation: "Because the evidence says so".into(),
                follow_up: "Correct fact".into(),
                source_titles: vec!["Wikipedia".into(), "News".into()],
                confidence: Confidence::new(65).unwrap(),
            };
            let reply = format!("Here you go:\n{}\n", serde_json::to_string_pretty(&verdict).unwrap());
            assert_eq!(parse_verdict(&reply), verdict);
        }
    }

    #[test]
    fn test_null_fields_keep_verdict() {
        let raw = r#"{"verdict":"Supported","explanation":"Confirmed by Wikipedia","follow_up":null,"source_titles":["Wikipedia"],"confidence":"85"}"#;
        let verdict = parse_verdict(raw);
        assert_eq!(verdict.verdict, VerdictKind::Supported);
        assert_eq!(verdict.follow_up, "");
        assert_eq!(verdict.source_titles, vec!["Wikipedia".to_string()]);
        assert_eq!(verdict.confidence.value(), 85);

        let raw = r#"{"verdict":"Not Enough Info","explanation":"Nothing found","follow_up":null,"source_titles":null,"confidence":20}"#;
        let verdict = parse_verdict(raw);
        assert_eq!(verdict.verdict, VerdictKind::NotEnoughInfo);
        assert!(verdict.source_titles.is_empty());
    }

    #[test]
    fn test_fractional_confidence_keeps_verdict() {
        let raw = r#"{"verdict":"Refuted","explanation":"Wrong person","follow_up":"Javier Milei is president","source_titles":["Wikipedia"],"confidence":85.5}"#;
        let verdict = parse_verdict(raw);
        assert_eq!(verdict.verdict, VerdictKind::Refuted);
        assert_eq!(verdict.confidence.value(), 86);

        let quoted = raw.replace("85.5", "\"85.5\"");
        assert_eq!(parse_verdict(&quoted).confidence.value(), 86);
    }
}
