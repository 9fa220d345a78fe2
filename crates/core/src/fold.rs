//! Case and diacritic folding for insensitive string matching.
//!
//! Folding lowercases every character, maps precomposed Latin letters onto
//! their base letter and drops combining marks, so `"Zoë"`, `"ZOE"` and
//! `"zoe\u{308}"` all fold to `"zoe"`.
//!
//! Decomposition follows Unicode canonical decomposition (NFD), so any
//! precomposed letter with a canonical base folds onto it. Letters with no
//! decomposition, like `ø` or `ł`, are mapped by a small table.
//!
//! ```
//! use tessera_core::fold::{contains_folded, fold, starts_with_folded};
//! assert_eq!(fold("Ångström"), "angstrom");
//! assert!(starts_with_folded("Émilie", "emi"));
//! assert!(contains_folded("Chloé Marchand", "OE MAR"));
//! ```

use alloc::string::String;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// =========================================================================
// Folding
// =========================================================================

/// Returns the case and diacritic insensitive form of `s`.
pub fn fold(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase).nfd() {
        if is_combining_mark(c) {
            continue;
        }
        push_base(&mut out, c);
    }
    out
}

/// True if `haystack` starts with `prefix` once both are folded.
pub fn starts_with_folded(haystack: &str, prefix: &str) -> bool {
    fold(haystack).starts_with(fold(prefix).as_str())
}

/// True if `haystack` contains `needle` once both are folded.
///
/// An empty needle is contained in every string.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold(haystack).contains(fold(needle).as_str())
}

/// Letters without a canonical decomposition.
fn push_base(out: &mut String, c: char) {
    match c {
        'æ' => out.push_str("ae"),
        'œ' => out.push_str("oe"),
        'ß' => out.push_str("ss"),
        'ĳ' => out.push_str("ij"),
        'ø' => out.push('o'),
        'đ' | 'ð' => out.push('d'),
        'ħ' => out.push('h'),
        'ı' => out.push('i'),
        'ĸ' => out.push('k'),
        'ŀ' | 'ł' | 'ƚ' => out.push('l'),
        'ŉ' | 'ŋ' => out.push('n'),
        'ſ' => out.push('s'),
        'ŧ' | 'þ' => out.push('t'),
        'ƀ' => out.push('b'),
        'ɨ' => out.push('i'),
        'ʉ' => out.push('u'),
        'ƶ' => out.push('z'),
        other => out.push(other),
    }
}
