//! Receipt date extraction
//!
//! Pattern families are tried in priority order; the first one that yields a
//! real calendar date wins:
//! 1. Numeric with a four-digit year (`MM/DD/YYYY`, `MM.DD.YYYY`, `YYYY-MM-DD`)
//! 2. Month names (`Jan 5, 2024`, `5 January 2024`)
//! 3. Numeric with a two-digit year, disambiguated by which part can't be a month
//! 4. Looser phrasings (`05-JAN-24`, `March 5th 24`, `5th of March, 2024`, `20240105`)

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

/// Month name or abbreviation, captured
const MONTH: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";

const ORDINAL: &str = r"(?:st|nd|rd|th)?";

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex")
}

static SLASH_DASH_YEAR_LAST: LazyLock<Regex> =
    LazyLock::new(|| regex(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4})\b"));

static DOTTED_YEAR_LAST: LazyLock<Regex> =
    LazyLock::new(|| regex(r"\b(\d{1,2})\.(\d{1,2})\.(\d{4})\b"));

static YEAR_FIRST: LazyLock<Regex> =
    LazyLock::new(|| regex(r"\b(\d{4})[/.-](\d{1,2})[/.-](\d{1,2})\b"));

static MONTH_DAY_YEAR: LazyLock<Regex> =
    LazyLock::new(|| regex(&format!(r"(?i)\b{MONTH}\s+(\d{{1,2}}){ORDINAL},?\s+(\d{{4}})\b")));

static DAY_MONTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| regex(&format!(r"(?i)\b(\d{{1,2}}){ORDINAL}\s+{MONTH},?\s+(\d{{4}})\b")));

static SHORT_YEAR: LazyLock<Regex> =
    LazyLock::new(|| regex(r"\b(\d{1,2})[/.-](\d{1,2})[/.-](\d{2})\b"));

static DAY_MONTH_DASHED: LazyLock<Regex> =
    LazyLock::new(|| regex(&format!(r"(?i)\b(\d{{1,2}})-{MONTH}-(\d{{4}}|\d{{2}})\b")));

static MONTH_DAY_LOOSE: LazyLock<Regex> = LazyLock::new(|| {
    regex(&format!(
        r"(?i)\b{MONTH}[-\s](\d{{1,2}}){ORDINAL}[-,\s]+(\d{{4}}|\d{{2}})\b"
    ))
});

static DAY_OF_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    regex(&format!(
        r"(?i)\b(\d{{1,2}}){ORDINAL}\s+of\s+{MONTH},?\s+(\d{{4}})\b"
    ))
});

static COMPACT: LazyLock<Regex> = LazyLock::new(|| regex(r"\b(20\d{2})(\d{2})(\d{2})\b"));

/// Field order of a three-part numeric date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    Mdy,
    Dmy,
    Ymd,
    Ydm,
}

/// Find the first recognizable date in the receipt text
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    let found = four_digit_numeric(text)
        .or_else(|| month_name(text))
        .or_else(|| two_digit_numeric(text))
        .or_else(|| loose_phrase(text));

    match found {
        Some(date) => debug!("Extracted date {}", date),
        None => debug!("No date found"),
    }
    found
}

fn four_digit_numeric(text: &str) -> Option<NaiveDate> {
    first_numeric(&SLASH_DASH_YEAR_LAST, text, &[Order::Mdy, Order::Dmy])
        .or_else(|| first_numeric(&DOTTED_YEAR_LAST, text, &[Order::Mdy, Order::Dmy]))
        .or_else(|| first_numeric(&YEAR_FIRST, text, &[Order::Ymd]))
}

fn month_name(text: &str) -> Option<NaiveDate> {
    MONTH_DAY_YEAR
        .captures_iter(text)
        .find_map(|c| build(num(&c[3])?, month_number(&c[1])?, num(&c[2])?))
        .or_else(|| {
            DAY_MONTH_YEAR
                .captures_iter(text)
                .find_map(|c| build(num(&c[3])?, month_number(&c[2])?, num(&c[1])?))
        })
}

fn two_digit_numeric(text: &str) -> Option<NaiveDate> {
    SHORT_YEAR.captures_iter(text).find_map(|c| {
        let parts = [num(&c[1])?, num(&c[2])?, num(&c[3])?];
        let orders: &[Order] = if parts[0] > 12 {
            &[Order::Dmy, Order::Ymd, Order::Ydm]
        } else if parts[1] > 12 {
            &[Order::Mdy, Order::Ydm]
        } else {
            &[Order::Mdy, Order::Dmy, Order::Ymd]
        };
        orders.iter().find_map(|&order| arrange(parts, order))
    })
}

fn loose_phrase(text: &str) -> Option<NaiveDate> {
    DAY_MONTH_DASHED
        .captures_iter(text)
        .find_map(|c| build(num(&c[3])?, month_number(&c[2])?, num(&c[1])?))
        .or_else(|| {
            MONTH_DAY_LOOSE
                .captures_iter(text)
                .find_map(|c| build(num(&c[3])?, month_number(&c[1])?, num(&c[2])?))
        })
        .or_else(|| {
            DAY_OF_MONTH
                .captures_iter(text)
                .find_map(|c| build(num(&c[3])?, month_number(&c[2])?, num(&c[1])?))
        })
        .or_else(|| {
            COMPACT
                .captures_iter(text)
                .find_map(|c| build(num(&c[1])?, num(&c[2])?, num(&c[3])?))
        })
}

/// First match of `re` that forms a valid date under any of `orders`
fn first_numeric(re: &Regex, text: &str, orders: &[Order]) -> Option<NaiveDate> {
    re.captures_iter(text).find_map(|c| {
        let parts = [num(&c[1])?, num(&c[2])?, num(&c[3])?];
        orders.iter().find_map(|&order| arrange(parts, order))
    })
}

fn arrange(parts: [u32; 3], order: Order) -> Option<NaiveDate> {
    let [a, b, c] = parts;
    match order {
        Order::Mdy => build(c, a, b),
        Order::Dmy => build(c, b, a),
        Order::Ymd => build(a, b, c),
        Order::Ydm => build(a, c, b),
    }
}

/// Validate and assemble; two-digit years land in the 2000s
fn build(year: u32, month: u32, day: u32) -> Option<NaiveDate> {
    let year = if year < 100 { 2000 + year } else { year };
    if !(1900..=2099).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

fn num(s: &str) -> Option<u32> {
    s.parse().ok()
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_four_digit_month_first() {
        assert_eq!(extract_date("DATE: 01/05/2024 14:22"), ymd(2024, 1, 5));
        assert_eq!(extract_date("01-05-2024"), ymd(2024, 1, 5));
    }

    #[test]
    fn test_four_digit_falls_back_to_day_first() {
        assert_eq!(extract_date("25/12/2023"), ymd(2023, 12, 25));
    }

    #[test]
    fn test_dotted_and_year_first() {
        assert_eq!(extract_date("12.24.2023"), ymd(2023, 12, 24));
        assert_eq!(extract_date("24.12.2023"), ymd(2023, 12, 24));
        assert_eq!(extract_date("2024-03-09 08:15"), ymd(2024, 3, 9));
        assert_eq!(extract_date("2024/3/9"), ymd(2024, 3, 9));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(extract_date("Jan 5, 2024"), ymd(2024, 1, 5));
        assert_eq!(extract_date("SEPT 30 2023"), ymd(2023, 9, 30));
        assert_eq!(extract_date("5 January 2024"), ymd(2024, 1, 5));
        assert_eq!(extract_date("21st Dec. 2022"), ymd(2022, 12, 21));
    }

    #[test]
    fn test_two_digit_day_first() {
        assert_eq!(extract_date("13/02/24"), ymd(2024, 2, 13));
    }

    #[test]
    fn test_two_digit_month_first() {
        assert_eq!(extract_date("02/13/24"), ymd(2024, 2, 13));
    }

    #[test]
    fn test_two_digit_ambiguous_prefers_month_first() {
        assert_eq!(extract_date("03/04/24"), ymd(2024, 3, 4));
    }

    #[test]
    fn test_two_digit_year_first_when_needed() {
        // Neither 24 nor 13 can be a month, so year-day-month
        assert_eq!(extract_date("24/13/05"), ymd(2024, 5, 13));
        // Feb 31 doesn't exist, so year-month-day
        assert_eq!(extract_date("31/02/11"), ymd(2031, 2, 11));
    }

    #[test]
    fn test_loose_phrases() {
        assert_eq!(extract_date("05-JAN-24"), ymd(2024, 1, 5));
        assert_eq!(extract_date("Jan-05-2024"), ymd(2024, 1, 5));
        assert_eq!(extract_date("March 5th 24"), ymd(2024, 3, 5));
        assert_eq!(extract_date("5th of March, 2024"), ymd(2024, 3, 5));
        assert_eq!(extract_date("TXN 20240105 0042"), ymd(2024, 1, 5));
    }

    #[test]
    fn test_family_priority() {
        // The numeric four-digit date appears later but wins
        assert_eq!(
            extract_date("Jan 5, 2024\nPrinted 02/03/2024"),
            ymd(2024, 2, 3)
        );
    }

    #[test]
    fn test_invalid_dates_skipped() {
        assert_eq!(extract_date("99/99/2024"), None);
        assert_eq!(extract_date("02/30/2024 then 03/01/2024"), ymd(2024, 3, 1));
        assert_eq!(extract_date("01/01/1850"), None);
    }

    #[test]
    fn test_no_date() {
        assert_eq!(extract_date("TOTAL 4.90\nTHANK YOU"), None);
        assert_eq!(extract_date(""), None);
    }
}
