//! Receipt total extraction
//!
//! Three passes, first hit wins:
//! 1. Total-anchored window: the last line mentioning a total keyword plus the
//!    next few lines; the largest amount there is the total.
//! 2. Global scoring: every amount scored by keyword proximity, sign, and how
//!    late it appears.
//! 3. Largest non-negative amount anywhere.
//!
//! Amounts are handled as integer cents so formatting is exact.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Checked in this order when looking for a total line
pub const TOTAL_KEYWORDS: &[&str] = &["total cad", "grand total", "amount due", "balance", "total"];

/// Optional `$`, integer part with optional `,ddd` groups, mandatory `.dd`.
/// Matches that are part of a dotted date or a clock time are dropped in
/// [`money_tokens`].
static MONEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$?(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2}\b").expect("valid regex")
});

const SAME_LINE_KEYWORD: i32 = 8;
const ADJACENT_LINE_KEYWORD: i32 = 5;
const NEGATIVE_PENALTY: i32 = -10;
const MAX_LATE_LINE_BONUS: i32 = 6;

/// One money token found in the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MoneyToken {
    line: usize,
    /// Magnitude in cents
    cents: i64,
    /// Written as `(1.00)` or `-1.00`
    negative: bool,
}

/// Pick the receipt total from OCR lines, formatted with two decimals
pub fn extract_amount<S: AsRef<str>>(lines: &[S], window: usize) -> Option<String> {
    let lowered: Vec<String> = lines.iter().map(|l| l.as_ref().to_lowercase()).collect();
    let tokens = money_tokens(&lowered);
    if tokens.is_empty() {
        return None;
    }
    let refund = is_refund(&lowered);

    if let Some(cents) = total_window_amount(&lowered, &tokens, window, refund) {
        debug!("Amount from total window: {}", format_cents(cents));
        return Some(format_cents(cents));
    }

    if let Some(cents) = best_scored_amount(&lowered, &tokens, refund) {
        debug!("Amount from candidate scoring: {}", format_cents(cents));
        return Some(format_cents(cents));
    }

    let fallback = tokens
        .iter()
        .filter(|t| !t.negative)
        .map(|t| t.cents)
        .max()?;
    debug!("Amount from last-resort maximum: {}", format_cents(fallback));
    Some(format_cents(fallback))
}

fn money_tokens(lines: &[String]) -> Vec<MoneyToken> {
    let mut tokens = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        for m in MONEY.find_iter(line) {
            let before = &line[..m.start()];
            let after = &line[m.end()..];
            if is_embedded(before, after) || is_clock_time(line, after, m.as_str()) {
                continue;
            }
            let Some(cents) = parse_cents(m.as_str()) else {
                continue;
            };
            let parenthesized =
                before.trim_end().ends_with('(') && after.trim_start().starts_with(')');
            let minus = before.ends_with('-');
            tokens.push(MoneyToken {
                line: index,
                cents,
                negative: parenthesized || minus,
            });
        }
    }
    tokens
}

/// Part of a longer dotted number such as `2024.01.15` or `12.31.2024`
fn is_embedded(before: &str, after: &str) -> bool {
    let glued_before = before
        .chars()
        .next_back()
        .is_some_and(|c| c == '.' || c.is_ascii_digit());
    let mut rest = after.chars();
    let glued_after = rest.next() == Some('.') && rest.next().is_some_and(|c| c.is_ascii_digit());
    glued_before || glued_after
}

/// `02.35 pm`, or `14.35` on a line labelled as a time
fn is_clock_time(line: &str, after: &str, token: &str) -> bool {
    if token.contains(['$', ',']) {
        return false;
    }
    let Some((hours, minutes)) = token.split_once('.') else {
        return false;
    };
    let (Ok(hours), Ok(minutes)) = (hours.parse::<u32>(), minutes.parse::<u32>()) else {
        return false;
    };
    if hours > 23 || minutes > 59 {
        return false;
    }

    let after = after.trim_start();
    let meridiem = ["am", "pm", "a.m", "p.m"].iter().any(|m| {
        after.starts_with(m)
            && !after[m.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric())
    });
    meridiem || line.contains("time")
}

/// "$1,234.56" -> 123456
fn parse_cents(token: &str) -> Option<i64> {
    let digits: String = token.chars().filter(|c| *c != '$' && *c != ',').collect();
    let (whole, frac) = digits.split_once('.')?;
    let whole: i64 = whole.parse().ok()?;
    let frac: i64 = frac.parse().ok()?;
    whole.checked_mul(100)?.checked_add(frac)
}

fn format_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

fn is_refund(lines: &[String]) -> bool {
    lines
        .iter()
        .any(|l| l.contains("refund") || l.contains("return"))
}

fn has_total_keyword(line: &str) -> bool {
    TOTAL_KEYWORDS.iter().any(|k| line.contains(k))
}

fn total_window_amount(
    lines: &[String],
    tokens: &[MoneyToken],
    window: usize,
    refund: bool,
) -> Option<i64> {
    let anchor = lines.iter().rposition(|l| has_total_keyword(l))?;
    let end = anchor.saturating_add(window);

    tokens
        .iter()
        .filter(|t| t.line >= anchor && t.line <= end)
        .filter(|t| refund || !t.negative)
        .map(|t| t.cents)
        .max()
}

fn score_token(lines: &[String], token: &MoneyToken, refund: bool) -> i32 {
    let mut score = 0;
    if has_total_keyword(&lines[token.line]) {
        score += SAME_LINE_KEYWORD;
    }
    if token.line > 0 && has_total_keyword(&lines[token.line - 1]) {
        score += ADJACENT_LINE_KEYWORD;
    }
    if lines.get(token.line + 1).is_some_and(|l| has_total_keyword(l)) {
        score += ADJACENT_LINE_KEYWORD;
    }
    if token.negative && !refund {
        score += NEGATIVE_PENALTY;
    }
    score + ((token.line / 5) as i32).min(MAX_LATE_LINE_BONUS)
}

fn best_scored_amount(lines: &[String], tokens: &[MoneyToken], refund: bool) -> Option<i64> {
    let mut best: Option<(i32, i64)> = None;
    for token in tokens.iter().filter(|t| t.cents > 0) {
        let candidate = (score_token(lines, token, refund), token.cents);
        if best.map_or(true, |b| candidate > b) {
            best = Some(candidate);
        }
    }
    best.map(|(_, cents)| cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(text: &str) -> Option<String> {
        let lines: Vec<&str> = text.lines().collect();
        extract_amount(&lines, 6)
    }

    #[test]
    fn test_total_beats_subtotal_and_tax() {
        assert_eq!(
            amount("Subtotal 10.00\nTax 1.00\nTotal 11.00").as_deref(),
            Some("11.00")
        );
    }

    #[test]
    fn test_last_total_line_anchors_window() {
        let text = "Total items 3\nBread 2.50\nMilk 4.25\nEggs 3.10\nSubtotal 9.85\nGST 0.49\nTOTAL 10.34";
        assert_eq!(amount(text).as_deref(), Some("10.34"));
    }

    #[test]
    fn test_window_takes_maximum() {
        let text = "TOTAL 4.90\nVISA 4.90\nCHANGE 0.00";
        assert_eq!(amount(text).as_deref(), Some("4.90"));
    }

    #[test]
    fn test_grouped_and_currency_tokens() {
        assert_eq!(amount("Amount due $1,234.56").as_deref(), Some("1234.56"));
        assert_eq!(parse_cents("$12,000.05"), Some(1_200_005));
        assert_eq!(parse_cents("7.00"), Some(700));
    }

    #[test]
    fn test_window_bounded() {
        let text = "Total 5.00\na\nb\nc\nd\ne\nf\nLater 99.00";
        assert_eq!(amount(text).as_deref(), Some("5.00"));
    }

    #[test]
    fn test_negative_skipped_in_window() {
        let text = "Amount due (25.00)\nVisa 20.00";
        assert_eq!(amount(text).as_deref(), Some("20.00"));
    }

    #[test]
    fn test_parenthesized_total_not_selected() {
        let text = "Coffee 3.00\nTotal (5.00)";
        assert_eq!(amount(text).as_deref(), Some("3.00"));
    }

    #[test]
    fn test_refund_keeps_negative() {
        let text = "REFUND\nTotal (5.00)";
        assert_eq!(amount(text).as_deref(), Some("5.00"));
    }

    #[test]
    fn test_minus_prefix_is_negative() {
        let tokens = money_tokens(&["discount -2.00".to_string(), "x 2.00".to_string()]);
        assert!(tokens[0].negative);
        assert!(!tokens[1].negative);
    }

    #[test]
    fn test_scoring_without_total_line() {
        // Keyword-free receipt: the late-line bonus decides
        let mut lines: Vec<String> = (0..10).map(|i| format!("line {}", i)).collect();
        lines[1] = "Widget 9.00".to_string();
        lines[7] = "Paid 4.00".to_string();
        assert_eq!(extract_amount(&lines, 6).as_deref(), Some("4.00"));
    }

    #[test]
    fn test_scoring_ties_prefer_larger() {
        assert_eq!(amount("Widget 2.00\nGadget 3.00").as_deref(), Some("3.00"));
    }

    #[test]
    fn test_all_zero_falls_through() {
        assert_eq!(amount("Paid 0.00").as_deref(), Some("0.00"));
    }

    #[test]
    fn test_no_money_tokens() {
        assert_eq!(amount("Hello\nWorld 12\n3.5"), None);
        assert_eq!(extract_amount::<&str>(&[], 6), None);
    }

    #[test]
    fn test_dotted_dates_after_total_ignored() {
        let text = "Corner Store\nMilk 4.90\nTOTAL 4.90\n2024.01.15 10:22";
        assert_eq!(amount(text).as_deref(), Some("4.90"));

        let text = "Shop\nItem 2.00\nTOTAL 2.00\nDate 12.31.2024";
        assert_eq!(amount(text).as_deref(), Some("2.00"));

        let text = "TOTAL 7.25\nVISA 7.25\n15.01.2024";
        assert_eq!(amount(text).as_deref(), Some("7.25"));
    }

    #[test]
    fn test_clock_times_after_total_ignored() {
        assert_eq!(amount("TOTAL 3.75\n02.35 PM").as_deref(), Some("3.75"));
        assert_eq!(amount("TOTAL 3.75\nTime 14.35").as_deref(), Some("3.75"));
        assert_eq!(amount("TOTAL 3.75\n11.05am Thank you").as_deref(), Some("3.75"));
    }

    #[test]
    fn test_embedded_numbers_are_not_tokens() {
        let lines = |s: &str| vec![s.to_string()];
        assert!(money_tokens(&lines("2024.01.15")).is_empty());
        assert!(money_tokens(&lines("12.31.2024")).is_empty());
        assert!(money_tokens(&lines("ref 1.234.56")).is_empty());
        assert!(money_tokens(&lines("10.30 pm")).is_empty());
        // Not a plausible clock, or written as money
        assert_eq!(money_tokens(&lines("36.80 pm")).len(), 1);
        assert_eq!(money_tokens(&lines("time saver $9.15")).len(), 1);
        assert_eq!(money_tokens(&lines("parmesan 4.50 pmt")).len(), 1);
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(490), "4.90");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(123456), "1234.56");
    }
}
