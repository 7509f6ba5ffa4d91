//! Knowledge-graph facts from the Wikidata SPARQL endpoint.
//!
//! The query matches items whose English label equals the query string
//! exactly and returns the labels of their property values.

use async_trait::async_trait;
use serde::Deserialize;

use super::{fetch_json, EvidenceSource, RetrievalError};
use crate::config::EndpointSettings;
use crate::domain::{EvidenceItem, SourceName};

pub struct WikidataSource {
    client: reqwest::Client,
    endpoint: String,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    #[serde(default)]
    bindings: Vec<Binding>,
}

#[derive(Debug, Deserialize)]
struct Binding {
    #[serde(rename = "valueLabel")]
    value_label: Option<BoundValue>,
}

#[derive(Debug, Deserialize)]
struct BoundValue {
    value: String,
}

impl WikidataSource {
    pub fn new(client: reqwest::Client, settings: &EndpointSettings) -> Self {
        Self {
            client,
            endpoint: settings.endpoint.clone(),
            limit: settings.limit,
        }
    }
}

/// Escape a string for use inside a double-quoted SPARQL literal
fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Property-value labels for items with an exact English label
pub fn sparql_query(label: &str, limit: usize) -> String {
    format!(
        r#"SELECT ?itemLabel ?valueLabel WHERE {{
  ?item rdfs:label "{}"@en.
  ?item ?property ?value.
  ?value rdfs:label ?valueLabel.
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "en". }}
}} LIMIT {}"#,
        escape_literal(label),
        limit
    )
}

fn value_labels(response: SparqlResponse) -> Vec<EvidenceItem> {
    response
        .results
        .bindings
        .into_iter()
        .filter_map(|b| b.value_label)
        .map(|v| EvidenceItem::WikidataFact(v.value))
        .collect()
}

#[async_trait]
impl EvidenceSource for WikidataSource {
    fn name(&self) -> SourceName {
        SourceName::Wikidata
    }

    async fn retrieve(&self, query: &str) -> Result<Vec<EvidenceItem>, RetrievalError> {
        let sparql = sparql_query(query, self.limit);
        let request = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/sparql-results+json")
            .query(&[("query", sparql.as_str()), ("format", "json")]);

        let response: SparqlResponse = fetch_json(request).await?;
        Ok(value_labels(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparql_query_shape() {
        let query = sparql_query("Albert Einstein", 10);
        assert!(query.contains(r#"?item rdfs:label "Albert Einstein"@en."#));
        assert!(query.ends_with("LIMIT 10"));
        assert!(query.contains("wikibase:language \"en\""));
    }

    #[test]
    fn test_sparql_literal_is_escaped() {
        let query = sparql_query(r#"The "Boss" \ x"#, 10);
        assert!(query.contains(r#""The \"Boss\" \\ x"@en"#));
    }

    #[test]
    fn test_value_labels_from_bindings() {
        let response: SparqlResponse = serde_json::from_str(
            r#"{"head":{"vars":["itemLabel","valueLabel"]},
                "results":{"bindings":[
                  {"itemLabel":{"type":"literal","value":"Albert Einstein"},
                   "valueLabel":{"xml:lang":"en","type":"literal","value":"physicist"}},
                  {"itemLabel":{"type":"literal","value":"Albert Einstein"}},
                  {"valueLabel":{"type":"literal","value":"Ulm"}}
                ]}}"#,
        )
        .unwrap();

        assert_eq!(
            value_labels(response),
            vec![
                EvidenceItem::WikidataFact("physicist".to_string()),
                EvidenceItem::WikidataFact("Ulm".to_string()),
            ]
        );
    }
}
