//! Amount parsing for claim numeric columns.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse an amount such as `1,250.00`, `-3.5` or `(42.10)`.
///
/// Commas are accepted only as thousands separators in the whole part
/// (`1,234,567.89`); any other comma placement is rejected. A parenthesised
/// value is negative. Returns `None` for empty or non-numeric input.
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let (negative, body) = match trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => (true, inner.trim()),
        None => (false, trimmed),
    };
    let cleaned = strip_thousands(body)?;
    if cleaned.is_empty() {
        return None;
    }
    let parsed = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()?;
    Some(if negative { -parsed } else { parsed })
}

/// Remove thousands separators, or `None` when a comma is misplaced.
fn strip_thousands(body: &str) -> Option<String> {
    if !body.contains(',') {
        return Some(body.to_string());
    }
    let (whole, fraction) = match body.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (body, None),
    };
    if fraction.is_some_and(|fraction| fraction.contains(',')) {
        return None;
    }
    let digits = whole.strip_prefix(['-', '+']).unwrap_or(whole);
    let mut groups = digits.split(',');
    let lead = groups.next()?;
    if lead.is_empty() || lead.len() > 3 || !lead.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !groups.all(|group| group.len() == 3 && group.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }
    Some(body.replace(',', ""))
}
