//! The structured verdict returned by a claim check.
//!
//! These types double as the reply schema for the reasoning engine:
//! the prompt renders its output contract from them and the parser
//! deserializes the reply straight into [`Verdict`].

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Outcome classification of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerdictKind {
    Supported,
    Refuted,
    #[serde(rename = "Not Enough Info")]
    NotEnoughInfo,
    /// The engine reply could not be parsed
    Error,
}

impl VerdictKind {
    /// Verdicts the reasoning engine is allowed to choose from
    pub const ENGINE_CHOICES: [VerdictKind; 3] = [
        VerdictKind::Supported,
        VerdictKind::Refuted,
        VerdictKind::NotEnoughInfo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictKind::Supported => "Supported",
            VerdictKind::Refuted => "Refuted",
            VerdictKind::NotEnoughInfo => "Not Enough Info",
            VerdictKind::Error => "Error",
        }
    }
}

impl fmt::Display for VerdictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence score in the range 0-100
///
/// Serialized as a decimal string (`"80"`). Deserialization accepts
/// either a string or a JSON number, since engines emit both; fractional
/// values are rounded to the nearest integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawConfidence", into = "String")]
pub struct Confidence(u8);

#[derive(Debug, Error, PartialEq)]
pub enum ConfidenceError {
    #[error("confidence {0} exceeds 100")]
    OutOfRange(u64),

    #[error("confidence is not a number: {0:?}")]
    NotANumber(String),
}

impl Confidence {
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Result<Self, ConfidenceError> {
        if value > Self::MAX {
            return Err(ConfidenceError::OutOfRange(value as u64));
        }
        Ok(Self(value))
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Confidence> for String {
    fn from(confidence: Confidence) -> Self {
        confidence.0.to_string()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawConfidence {
    Integer(u64),
    Float(f64),
    Text(String),
}

fn rounded(value: f64, raw: &str) -> Result<u64, ConfidenceError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfidenceError::NotANumber(raw.to_string()));
    }
    Ok(value.round() as u64)
}

impl TryFrom<RawConfidence> for Confidence {
    type Error = ConfidenceError;

    fn try_from(raw: RawConfidence) -> Result<Self, Self::Error> {
        let value = match raw {
            RawConfidence::Integer(n) => n,
            RawConfidence::Float(f) => rounded(f, &f.to_string())?,
            RawConfidence::Text(s) => {
                let trimmed = s.trim().trim_end_matches('%').trim();
                match trimmed.parse::<u64>() {
                    Ok(n) => n,
                    Err(_) => {
                        let f = trimmed
                            .parse::<f64>()
                            .map_err(|_| ConfidenceError::NotANumber(s.clone()))?;
                        rounded(f, &s)?
                    }
                }
            }
        };

        if value > Self::MAX as u64 {
            return Err(ConfidenceError::OutOfRange(value));
        }
        Ok(Self(value as u8))
    }
}

/// Treat an explicit `null` like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Structured outcome of verifying one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub verdict: VerdictKind,

    /// Short justification grounded in the evidence
    pub explanation: String,

    /// Corrected fact when the claim is refuted
    #[serde(default, deserialize_with = "null_as_default")]
    pub follow_up: String,

    /// Sources the engine relied on
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_titles: Vec<String>,

    pub confidence: Confidence,
}

impl Verdict {
    /// Field names of the reply object, in contract order
    pub const FIELDS: [&'static str; 5] = [
        "verdict",
        "explanation",
        "follow_up",
        "source_titles",
        "confidence",
    ];

    /// Verdict used when the engine reply cannot be parsed
    ///
    /// The raw reply is embedded verbatim so the failure can be diagnosed.
    pub fn fallback(raw_output: &str) -> Self {
        Self {
            verdict: VerdictKind::Error,
            explanation: format!(
                "Reasoning engine did not return a valid verdict object. Raw output: {}",
                raw_output
            ),
            follow_up: String::new(),
            source_titles: Vec::new(),
            confidence: Confidence::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_kind_wire_names() {
        let json = serde_json::to_string(&VerdictKind::NotEnoughInfo).unwrap();
        assert_eq!(json, r#""Not Enough Info""#);

        let parsed: VerdictKind = serde_json::from_str(r#""Refuted""#).unwrap();
        assert_eq!(parsed, VerdictKind::Refuted);

        assert!(serde_json::from_str::<VerdictKind>(r#""Mostly True""#).is_err());
    }

    #[test]
    fn test_confidence_accepts_string_and_number() {
        let from_str: Confidence = serde_json::from_str(r#""80""#).unwrap();
        let from_num: Confidence = serde_json::from_str("80").unwrap();
        let from_pct: Confidence = serde_json::from_str(r#""80%""#).unwrap();
        assert_eq!(from_str.value(), 80);
        assert_eq!(from_num, from_str);
        assert_eq!(from_pct, from_str);

        assert_eq!(serde_json::to_string(&from_num).unwrap(), r#""80""#);
    }

    #[test]
    fn test_confidence_rejects_out_of_range() {
        assert!(serde_json::from_str::<Confidence>(r#""101""#).is_err());
        assert!(serde_json::from_str::<Confidence>("250").is_err());
        assert!(serde_json::from_str::<Confidence>(r#""0-100""#).is_err());
        assert!(serde_json::from_str::<Confidence>("100.6").is_err());
        assert!(serde_json::from_str::<Confidence>(r#""-5""#).is_err());
        assert_eq!(Confidence::new(101), Err(ConfidenceError::OutOfRange(101)));
    }

    #[test]
    fn test_fallback_shape() {
        let verdict = Verdict::fallback("I cannot answer that");
        assert_eq!(verdict.verdict, VerdictKind::Error);
        assert!(verdict.explanation.contains("I cannot answer that"));
        assert!(verdict.follow_up.is_empty());
        assert!(verdict.source_titles.is_empty());

        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["confidence"], "0");
        assert_eq!(json["verdict"], "Error");
    }

    #[test]
    fn test_optional_fields_default() {
        let verdict: Verdict = serde_json::from_str(
            r#"{"verdict":"Supported","explanation":"ok","confidence":"70"}"#,
        )
        .unwrap();
        assert!(verdict.follow_up.is_empty());
        assert!(verdict.source_titles.is_empty());
    }

    #[test]
    fn test_fractional_confidence_rounds() {
        let from_num: Confidence = serde_json::from_str("85.5").unwrap();
        let from_str: Confidence = serde_json::from_str(r#""85.4""#).unwrap();
        let from_pct: Confidence = serde_json::from_str(r#""99.9%""#).unwrap();
        assert_eq!(from_num.value(), 86);
        assert_eq!(from_str.value(), 85);
        assert_eq!(from_pct.value(), 100);
    }

    #[test]
    fn test_null_optional_fields_default() {
        let verdict: Verdict = serde_json::from_str(
            r#"{"verdict":"Supported","explanation":"ok","follow_up":null,"source_titles":null,"confidence":"70"}"#,
        )
        .unwrap();
        assert!(verdict.follow_up.is_empty());
        assert!(verdict.source_titles.is_empty());
    }
}
