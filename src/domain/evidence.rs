//! Evidence items and the per-source bundle they are collected into.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// The fixed set of knowledge providers, in bundle order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceName {
    Wikipedia,
    News,
    Wikidata,
    GoogleFactCheck,
}

impl SourceName {
    /// All sources in the order they appear in a bundle
    pub const ALL: [SourceName; 4] = [
        SourceName::Wikipedia,
        SourceName::News,
        SourceName::Wikidata,
        SourceName::GoogleFactCheck,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceName::Wikipedia => "Wikipedia",
            SourceName::News => "News",
            SourceName::Wikidata => "Wikidata",
            SourceName::GoogleFactCheck => "GoogleFactCheck",
        }
    }

    /// Professional fact-check results outrank every other source
    pub fn is_high_reliability(&self) -> bool {
        matches!(self, SourceName::GoogleFactCheck)
    }

    fn index(&self) -> usize {
        match self {
            SourceName::Wikipedia => 0,
            SourceName::News => 1,
            SourceName::Wikidata => 2,
            SourceName::GoogleFactCheck => 3,
        }
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of retrieved information from a single provider
///
/// Equality is by value: two items are duplicates only if every field
/// matches, not just the title.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EvidenceItem {
    /// Intro summary of an encyclopedia page
    WikiSummary {
        title: String,
        summary: String,
        url: String,
    },

    /// `"title: description"` of a news article
    NewsArticle(String),

    /// Label of a property value from the knowledge graph
    WikidataFact(String),

    /// Claim record from the fact-check search API, kept as returned
    FactCheckClaim(serde_json::Value),
}

/// How an item is laid out when rendered as evidence text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayForm {
    Structured { title: String, summary: String },
    Scalar(String),
}

impl EvidenceItem {
    /// Text used for entity relevance matching
    pub fn searchable_text(&self) -> String {
        match self {
            EvidenceItem::WikiSummary { title, summary, .. } => format!("{} {}", title, summary),
            EvidenceItem::NewsArticle(text) | EvidenceItem::WikidataFact(text) => text.clone(),
            EvidenceItem::FactCheckClaim(record) => {
                let mut values = Vec::new();
                string_leaves(record, &mut values);
                values.join(" ")
            }
        }
    }

    /// Shape of the item when formatted for the reasoning engine
    pub fn display_form(&self) -> DisplayForm {
        match self {
            EvidenceItem::WikiSummary { title, summary, .. } => DisplayForm::Structured {
                title: title.clone(),
                summary: summary.clone(),
            },
            EvidenceItem::NewsArticle(text) | EvidenceItem::WikidataFact(text) => {
                DisplayForm::Scalar(text.clone())
            }
            EvidenceItem::FactCheckClaim(record) => DisplayForm::Structured {
                title: json_str(record, &["text"]).unwrap_or_default().to_string(),
                summary: review_summary(record),
            },
        }
    }
}

/// String values of a JSON record; keys are skipped
fn string_leaves<'a>(value: &'a serde_json::Value, out: &mut Vec<&'a str>) {
    match value {
        serde_json::Value::String(text) => out.push(text),
        serde_json::Value::Array(items) => items.iter().for_each(|v| string_leaves(v, out)),
        serde_json::Value::Object(fields) => fields.values().for_each(|v| string_leaves(v, out)),
        _ => {}
    }
}

/// Publisher and rating of the first review attached to a fact-check claim
fn review_summary(record: &serde_json::Value) -> String {
    let review = record.get("claimReview").and_then(|r| r.get(0));
    let publisher = review.and_then(|r| json_str(r, &["publisher", "name"]));
    let rating = review.and_then(|r| json_str(r, &["textualRating"]));

    match (publisher, rating) {
        (Some(publisher), Some(rating)) => format!("{}: {}", publisher, rating),
        (None, Some(rating)) => rating.to_string(),
        (Some(publisher), None) => publisher.to_string(),
        (None, None) => String::new(),
    }
}

fn json_str<'a>(value: &'a serde_json::Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |v, key| v.get(*key))
        .and_then(|v| v.as_str())
}

/// Per-source evidence for one claim check
///
/// Always holds exactly one (possibly empty) list per [`SourceName`];
/// iteration follows [`SourceName::ALL`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceBundle {
    lists: [Vec<EvidenceItem>; 4],
}

impl SourceBundle {
    /// Create a bundle with four empty lists
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source: SourceName) -> &[EvidenceItem] {
        &self.lists[source.index()]
    }

    pub fn get_mut(&mut self, source: SourceName) -> &mut Vec<EvidenceItem> {
        &mut self.lists[source.index()]
    }

    /// Replace the list for a source
    pub fn set(&mut self, source: SourceName, items: Vec<EvidenceItem>) {
        self.lists[source.index()] = items;
    }

    /// Builder-style variant of [`SourceBundle::set`]
    pub fn with(mut self, source: SourceName, items: Vec<EvidenceItem>) -> Self {
        self.set(source, items);
        self
    }

    /// Iterate sources in fixed order with their items
    pub fn iter(&self) -> impl Iterator<Item = (SourceName, &[EvidenceItem])> {
        SourceName::ALL
            .into_iter()
            .map(move |source| (source, self.get(source)))
    }

    /// Total number of items across all sources
    pub fn len(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for SourceBundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SourceName::ALL.len()))?;
        for (source, items) in self.iter() {
            map.serialize_entry(source.as_str(), items)?;
        }
        map.end()
    }
}
