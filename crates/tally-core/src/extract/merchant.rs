//! Merchant-line detection
//!
//! The store name is usually one of the first few lines of a receipt, but OCR
//! also picks up totals, addresses, phone numbers and stray camera UI text.
//! Lines that look like any of those are rejected outright; the rest are
//! ranked by position and by how much they look like a name.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static BANNED_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:sub\s*total|total|tax|hst|gst|pst|qst|vat|visa|mastercard|amex|interac|debit|credit|cash|change|payment|paid|approved|declined|auth(?:orization)?|card|register|reg|terminal|term|trans(?:action)?|txn|receipt|thank(?:s)?|order|item|items|qty|invoice|cashier|server|table|guest|balance|amount|tip|tendered|customer copy|merchant copy)\b",
    )
    .expect("valid regex")
});

/// Whole-line camera/scanner UI labels
const CAMERA_UI_WORDS: &[&str] = &[
    "photo", "video", "hdr", "portrait", "flash", "cancel", "retake", "done", "1x", "2x",
    "0.5x", "pano", "slo-mo", "time-lapse", "cinematic", "auto", "live", "square",
];

/// Camera/scanner UI phrases that can appear inside a line
const CAMERA_UI_PHRASES: &[&str] = &[
    "tap to focus",
    "live text",
    "use photo",
    "scan document",
    "keep scan",
    "ae/af lock",
    "position the document",
];

static STREET_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*\d{1,6}[a-z]?\s+.*\b(?:st|street|ave|avenue|rd|road|blvd|boulevard|dr|drive|ln|lane|way|ct|court|pl|place|pkwy|parkway|hwy|highway|cres|crescent|sq|square|terr?|terrace)\b",
    )
    .expect("valid regex")
});

/// `City, ST 12345` or `CITY ST 12345`; a bare `BP 01234` is not an address
static US_STATE_ZIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:,\s*|\b[A-Za-z]{3,}\.?\s+)[A-Z]{2}\s+\d{5}(?:-\d{4})?\b")
        .expect("valid regex")
});

static CANADIAN_POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b[a-z]\d[a-z]\s?\d[a-z]\d\b").expect("valid regex"));

static PO_BOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bp\.?\s*o\.?\s*box\b").expect("valid regex"));

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?1[\s.-]?)?\(?\b\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}\b").expect("valid regex")
});

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.+-]+@[\w-]+\.[\w.-]+").expect("valid regex"));

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:https?://|www\.)|\.(?:com|ca|net|org|co)\b").expect("valid regex")
});

/// Pick the line most likely to be the merchant name
///
/// Only the first `max_scan` lines are considered. When every line is
/// rejected the first line is returned as-is; `None` only for no lines.
pub fn extract_merchant_line<S: AsRef<str>>(lines: &[S], max_scan: usize) -> Option<String> {
    let first = lines.first()?.as_ref();

    let mut best: Option<(i32, &str)> = None;
    for (index, line) in lines.iter().take(max_scan).enumerate() {
        let line = line.as_ref().trim();
        if line.is_empty() || is_rejected(line) {
            continue;
        }
        let score = score_line(line, index);
        if best.map_or(true, |(s, _)| score > s) {
            best = Some((score, line));
        }
    }

    match best {
        Some((score, line)) => {
            debug!("Merchant line '{}' (score {})", line, score);
            Some(line.to_string())
        }
        None => {
            debug!("No merchant line survived filtering, using first line");
            Some(first.trim().to_string())
        }
    }
}

fn is_rejected(line: &str) -> bool {
    BANNED_KEYWORDS.is_match(line)
        || is_camera_noise(line)
        || looks_like_address(line)
        || PHONE.is_match(line)
        || EMAIL.is_match(line)
        || URL.is_match(line)
}

fn is_camera_noise(line: &str) -> bool {
    let lower = line.to_lowercase();
    CAMERA_UI_WORDS.contains(&lower.as_str())
        || CAMERA_UI_PHRASES.iter().any(|p| lower.contains(p))
}

fn looks_like_address(line: &str) -> bool {
    STREET_ADDRESS.is_match(line)
        || US_STATE_ZIP.is_match(line)
        || CANADIAN_POSTAL_CODE.is_match(line)
        || PO_BOX.is_match(line)
}

fn score_line(line: &str, index: usize) -> i32 {
    let mut score = 8i32.saturating_sub(index.min(8) as i32);

    let words: Vec<&str> = line.split_whitespace().collect();
    if (1..=4).contains(&words.len()) {
        score += 3;
    }

    let visible = line.chars().filter(|c| !c.is_whitespace()).count();
    let letters = line.chars().filter(|c| c.is_alphabetic()).count();
    if letters >= 3 && letters as f64 > visible as f64 * 0.6 {
        score += 3;
    }

    let capitalized = words
        .iter()
        .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
        .count();
    if !words.is_empty() && capitalized as f64 >= words.len() as f64 * 0.6 {
        score += 2;
    }

    score += match line.chars().filter(|c| c.is_ascii_digit()).count() {
        0 => 2,
        1..=4 => 0,
        _ => -3,
    };

    score
}
