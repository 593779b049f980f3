//! Ordering of Hebrew display names.
//!
//! Final letter forms sort with their base letter and pointing marks are
//! ignored, which matches `localeCompare(.., "he")` for settlement names.

use std::cmp::Ordering;

fn base_letter(c: char) -> char {
    match c {
        'ך' => 'כ',
        'ם' => 'מ',
        'ן' => 'נ',
        'ף' => 'פ',
        'ץ' => 'צ',
        other => other,
    }
}

// Points and cantillation. Maqaf, paseq, sof pasuq and nun hafukha are
// punctuation and stay significant.
fn is_hebrew_mark(c: char) -> bool {
    matches!(c, '\u{0591}'..='\u{05C7}') && !matches!(c, '\u{05BE}' | '\u{05C0}' | '\u{05C3}' | '\u{05C6}')
}

fn primary_key(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars()
        .filter(|c| !is_hebrew_mark(*c))
        .map(base_letter)
        .flat_map(char::to_lowercase)
}

/// Compare two names in Hebrew collation order.
///
/// Names equal at the primary level are ordered by their raw text so the
/// result is total.
pub fn hebrew_cmp(a: &str, b: &str) -> Ordering {
    primary_key(a).cmp(primary_key(b)).then_with(|| a.cmp(b))
}
