//! Locale-tolerant money input.
//!
//! Users type amounts the way their keyboard and habits suggest: `1 234,56`,
//! `1,234.56`, `0,5`, `-12.00`. [`parse`] normalizes all of them to a
//! canonical [`Decimal`]; amounts are never carried as floating point.
//!
//! ```rust
//! use engine::money;
//!
//! assert_eq!(money::parse("1 234,56").unwrap().to_string(), "1234.56");
//! assert_eq!(money::parse("1,234.56").unwrap().to_string(), "1234.56");
//! assert!(money::parse("abc").is_none());
//! ```
use std::str::FromStr;

use api_types::Currency;
use rust_decimal::{Decimal, RoundingStrategy};

/// Characters treated as thousands-group spacing and dropped before parsing.
const GROUP_SPACES: [char; 4] = [' ', '\u{00A0}', '\u{202F}', '\u{2009}'];

const DECIMAL_SEPARATORS: [char; 2] = ['.', ','];

/// Parses free-form user input into a canonical decimal.
///
/// Rules:
/// - spaces (regular, non-breaking, narrow) are group separators and dropped
/// - a leading `+` is dropped, a leading `-` is kept
/// - the **rightmost** `.` or `,` is the decimal separator; any other
///   separator before it is a group separator
/// - non-digit characters are discarded
/// - fails when neither side of the separator holds a digit
///
/// Returns `None` on failure; parse errors are not exceptional for user input.
#[must_use]
pub fn parse(input: &str) -> Option<Decimal> {
    let compact: String = input
        .trim()
        .chars()
        .filter(|c| !GROUP_SPACES.contains(c))
        .collect();

    let (negative, rest) = match compact.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, compact.strip_prefix('+').unwrap_or(&compact)),
    };
    if rest.is_empty() {
        return None;
    }

    let (integer_raw, fraction_raw) = match rest.rfind(DECIMAL_SEPARATORS) {
        Some(idx) => (&rest[..idx], &rest[idx + 1..]),
        None => (rest, ""),
    };

    let integer = digits(integer_raw);
    let fraction = digits(fraction_raw);
    if integer.is_empty() && fraction.is_empty() {
        return None;
    }

    let mut canonical = String::with_capacity(integer.len() + fraction.len() + 2);
    if negative {
        canonical.push('-');
    }
    if integer.is_empty() {
        canonical.push('0');
    } else {
        canonical.push_str(&integer);
    }
    if !fraction.is_empty() {
        canonical.push('.');
        canonical.push_str(&fraction);
    }

    match Decimal::from_str(&canonical) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!("money input {canonical:?} rejected: {err}");
            None
        }
    }
}

fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Canonical, locale-independent text for an amount (`1234.56`, `-12.00`).
///
/// The scale of the value is preserved, so `parse` followed by `format` is
/// lossless.
#[must_use]
pub fn format(amount: Decimal) -> String {
    amount.to_string()
}

/// Formats an amount rounded to the currency minor units, e.g. `12.50 EUR`.
#[must_use]
pub fn format_with_currency(amount: Decimal, currency: Currency) -> String {
    let scale = currency.minor_units();
    let mut rounded = amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(scale);
    format!("{rounded} {}", currency.code())
}
