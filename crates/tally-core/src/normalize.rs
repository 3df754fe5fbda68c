//! Merchant text normalization
//!
//! Turns arbitrary merchant-like text into a comparison key:
//! - Lowercase, accents folded to base letters (NFKD + combining mark strip)
//! - Anything outside `[a-z0-9&+ ]` replaced with a space
//! - Trailing store/unit identifiers (`store 123`, `unit 45`, `no. 7`) removed
//! - Trailing register/transaction numbers (3-6 digits) removed
//! - Whitespace collapsed and trimmed
//!
//! The key is idempotent: `normalize(&normalize(s)) == normalize(s)`.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// `store 123`, `unit 45`, `no 7`, `#99` at the end of the key.
/// `.` is already a space by the time this runs; `#` is kept until after it.
static TRAILING_UNIT_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(?:^|\s)(?:store|unit|no)|#)\s*\d+\s*$").expect("valid regex")
});

/// Bare 3-6 digit token at the end of the key
static TRAILING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)\d{3,6}\s*$").expect("valid regex"));

/// Normalize merchant text into a canonical comparison key.
///
/// Never fails; empty or symbol-only input yields an empty string.
pub fn normalize(s: &str) -> String {
    let lowered = s.to_lowercase();

    let mapped: String = lowered
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '&' | '+' | ' ' | '#')
            {
                c
            } else {
                ' '
            }
        })
        .collect();

    let key = strip_trailing_ids(mapped).replace('#', " ");
    let key = strip_trailing_ids(key);

    key.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove trailing unit IDs and register numbers until nothing changes.
/// Stacked IDs ("store 12 4471") need more than one pass.
fn strip_trailing_ids(mut key: String) -> String {
    loop {
        let without_unit = TRAILING_UNIT_ID.replace(&key, "");
        let stripped = TRAILING_NUMBER.replace(&without_unit, "").into_owned();
        if stripped == key {
            return key;
        }
        key = stripped;
    }
}
