//! Accent-insensitive query variant.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Strip diacritics and lowercase
///
/// Canonically decomposes the text, drops combining marks, then
/// lowercases, so `"José"` becomes `"jose"`.
pub fn normalize(text: &str) -> String {
    // Strip marks before lowercasing: lowercasing `İ` emits `i` plus a
    // combining dot that would otherwise survive
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}
