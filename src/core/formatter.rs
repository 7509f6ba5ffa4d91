//! Evidence rendering for the reasoning engine.

use crate::domain::{DisplayForm, EvidenceItem, SourceBundle, SourceName};

/// Separator between formatted items in the evidence block
pub const ITEM_SEPARATOR: &str = "\n\n";

/// Bracketed source tag, upper-cased and flagged for high-reliability sources
pub fn source_tag(source: SourceName) -> String {
    if source.is_high_reliability() {
        format!("[{} - HIGH RELIABILITY]", source.as_str().to_uppercase())
    } else {
        format!("[{}]", source.as_str())
    }
}

pub fn format_item(source: SourceName, item: &EvidenceItem) -> String {
    let tag = source_tag(source);
    match item.display_form() {
        DisplayForm::Structured { title, summary } => {
            format!("{} Title: {}\nSummary: {}", tag, title, summary)
        }
        DisplayForm::Scalar(text) => format!("{} {}", tag, text),
    }
}

/// One string per item, sources in bundle order, items in list order
pub fn format_evidence(bundle: &SourceBundle) -> Vec<String> {
    bundle
        .iter()
        .flat_map(|(source, items)| items.iter().map(move |item| format_item(source, item)))
        .collect()
}

/// All formatted items joined into a single block
pub fn evidence_block(bundle: &SourceBundle) -> String {
    format_evidence(bundle).join(ITEM_SEPARATOR)
}
