//! Entity relevance filter.
//!
//! Deliberately coarse: an item survives if any whitespace-separated token
//! of the entity occurs, case-insensitively, anywhere in its searchable
//! text. A claim about "Karina Milei" therefore keeps evidence that only
//! mentions "Javier Milei". Deciding that such evidence contradicts the
//! claim is left to the reasoning engine.

use crate::domain::{EvidenceItem, SourceBundle};

/// Lowercased entity tokens used for matching
pub fn entity_tokens(entity: &str) -> Vec<String> {
    entity.split_whitespace().map(str::to_lowercase).collect()
}

/// Whether any token is a substring of the item's searchable text
pub fn is_relevant(item: &EvidenceItem, tokens: &[String]) -> bool {
    let text = item.searchable_text().to_lowercase();
    tokens.iter().any(|token| text.contains(token.as_str()))
}

/// Keep only items relevant to `entity`, per source, preserving order
///
/// An entity with no tokens (empty or whitespace) matches nothing.
pub fn filter_by_entity(bundle: &SourceBundle, entity: &str) -> SourceBundle {
    let tokens = entity_tokens(entity);

    let mut filtered = SourceBundle::new();
    for (source, items) in bundle.iter() {
        let kept = items
            .iter()
            .filter(|item| is_relevant(item, &tokens))
            .cloned()
            .collect();
        filtered.set(source, kept);
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceName;
    use serde_json::json;

    fn news(text: &str) -> EvidenceItem {
        EvidenceItem::NewsArticle(text.to_string())
    }

    #[test]
    fn test_any_token_matches() {
        let tokens = entity_tokens("Albert Einstein");
        assert!(is_relevant(&news("Einstein born in Germany"), &tokens));
        assert!(!is_relevant(&news("Newton born in England"), &tokens));
    }

    #[test]
    fn test_partial_entity_overlap_is_kept() {
        // Shared surname is enough; the engine decides it contradicts the claim
        let tokens = entity_tokens("Karina Milei");
        assert!(is_relevant(&news("Javier Milei is president"), &tokens));
    }

    #[test]
    fn test_case_insensitive_substring() {
        let tokens = entity_tokens("MILEI");
        assert!(is_relevant(&news("javier milei's cabinet"), &tokens));

        // Substring, not word match
        let tokens = entity_tokens("Ein");
        assert!(is_relevant(&news("Einstein"), &tokens));
    }

    #[test]
    fn test_wiki_summary_matches_on_title_or_summary() {
        let item = EvidenceItem::WikiSummary {
            title: "Theory of relativity".into(),
            summary: "Developed by Albert Einstein".into(),
            url: "https://en.wikipedia.org/wiki/Theory_of_relativity".into(),
        };
        assert!(is_relevant(&item, &entity_tokens("Einstein")));
        assert!(is_relevant(&item, &entity_tokens("relativity")));
        assert!(!is_relevant(&item, &entity_tokens("Theory_of")));
    }

    #[test]
    fn test_filter_bundle_per_source() {
        let bundle = SourceBundle::new()
            .with(
                SourceName::News,
                vec![news("Einstein visits Princeton"), news("Stock markets rally")],
            )
            .with(
                SourceName::GoogleFactCheck,
                vec![EvidenceItem::FactCheckClaim(json!({"text": "Einstein failed math"}))],
            )
            .with(
                SourceName::Wikidata,
                vec![EvidenceItem::WikidataFact("physicist".into())],
            );

        let filtered = filter_by_entity(&bundle, "Albert Einstein");
        assert_eq!(filtered.get(SourceName::News), &[news("Einstein visits Princeton")]);
        assert_eq!(filtered.get(SourceName::GoogleFactCheck).len(), 1);
        assert!(filtered.get(SourceName::Wikidata).is_empty());
        assert!(filtered.get(SourceName::Wikipedia).is_empty());
    }

    #[test]
    fn test_fact_check_keys_do_not_match() {
        let claim = EvidenceItem::FactCheckClaim(json!({
            "text": "Vaccines contain microchips",
            "claimReview": [{"publisher": {"name": "Reuters", "site": "reuters.com"}, "textualRating": "False"}]
        }));
        assert!(!is_relevant(&claim, &entity_tokens("name")));
        assert!(!is_relevant(&claim, &entity_tokens("review")));
        assert!(is_relevant(&claim, &entity_tokens("Reuters")));
        assert!(is_relevant(&claim, &entity_tokens("microchips")));
    }

    #[test]
    fn test_blank_entity_matches_nothing() {
        let bundle = SourceBundle::new().with(SourceName::News, vec![news("anything")]);
        assert!(filter_by_entity(&bundle, "   ").is_empty());
    }
}
