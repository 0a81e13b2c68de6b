//! Romanian number formats.
//!
//! Dots group thousands and the comma is the decimal point (`30.075,79`).
//! A single separator followed by exactly three trailing digits is read as a
//! thousands grouping whichever character it is (`2.318` and `2,318` are
//! both 2318).

use std::str::FromStr;

use rust_decimal::Decimal;

use super::patterns::NUMERIC_PREFIX;

/// Parse a Romanian-formatted number. `None` when no numeric prefix exists.
pub fn normalize_number(raw: &str) -> Option<f64> {
    let canonical = canonicalize(raw);
    numeric_prefix(&canonical)?.parse().ok()
}

/// Parse a Romanian-formatted money amount, rounded to 2 decimals.
pub fn normalize_amount(raw: &str) -> Option<Decimal> {
    let canonical = canonicalize(raw);
    let prefix = numeric_prefix(&canonical)?;
    let prefix = prefix.strip_suffix('.').unwrap_or(prefix);
    Decimal::from_str(prefix).ok().map(|amount| amount.round_dp(2))
}

fn canonicalize(raw: &str) -> String {
    let value: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    if is_thousands_grouped(&value, '.', ',') {
        value.replace('.', "")
    } else if is_thousands_grouped(&value, ',', '.') {
        value.replace(',', "")
    } else {
        value.replace('.', "").replacen(',', ".", 1)
    }
}

/// `separator` followed by exactly three digits at the end, with `other` absent.
fn is_thousands_grouped(value: &str, separator: char, other: char) -> bool {
    if value.contains(other) {
        return false;
    }
    match value.rsplit_once(separator) {
        Some((_, tail)) => tail.len() == 3 && tail.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

fn numeric_prefix(value: &str) -> Option<&str> {
    NUMERIC_PREFIX.find(value).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_romanian_decimal() {
        assert_eq!(normalize_number("30.075,79"), Some(30075.79));
        assert_eq!(normalize_number("8.234,50"), Some(8234.5));
    }

    #[test]
    fn test_three_digit_tail_is_thousands() {
        assert_eq!(normalize_number("2.318"), Some(2318.0));
        assert_eq!(normalize_number("2,318"), Some(2318.0));
        assert_eq!(normalize_number("1.234.567"), Some(1234567.0));
    }

    #[test]
    fn test_plain_and_spaced_numbers() {
        assert_eq!(normalize_number("48"), Some(48.0));
        assert_eq!(normalize_number(" 12 450 "), Some(12450.0));
        assert_eq!(normalize_number("-3,5"), Some(-3.5));
    }

    #[test]
    fn test_trailing_garbage_is_ignored() {
        assert_eq!(normalize_number("12,5kWh"), Some(12.5));
    }

    #[test]
    fn test_no_digits_is_not_found() {
        assert_eq!(normalize_number(""), None);
        assert_eq!(normalize_number(",."), None);
        assert_eq!(normalize_number("-"), None);
    }

    #[test]
    fn test_amount_precision() {
        assert_eq!(normalize_amount("30.075,79"), Decimal::from_str("30075.79").ok());
        assert_eq!(normalize_amount("1,005"), Decimal::from_str("1005").ok());
        assert_eq!(normalize_amount("10,129"), Decimal::from_str("10129").ok());
        assert_eq!(normalize_amount("10,1299"), Decimal::from_str("10.13").ok());
        assert_eq!(normalize_amount("7,"), Decimal::from_str("7").ok());
    }
}
