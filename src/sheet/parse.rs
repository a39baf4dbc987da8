//! Cell value coercion for spreadsheet exports
//!
//! Malformed cells never fail a load: they coerce to 0 and are logged.

use log::warn;

/// Parse a currency cell such as `"$1,250,000.00"` or `"-3,000"`.
///
/// Every character other than digits, `.` and `-` is stripped before
/// parsing. Empty cells are 0. Accounting-style parentheses are stripped
/// like any other symbol, so `"(500)"` reads as 500.
pub fn parse_currency(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return 0.0;
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            warn!("coercing malformed currency cell {:?} to 0", raw);
            0.0
        }
    }
}

/// Parse a percentage cell into a fraction.
///
/// A trailing `%` is stripped. Values whose magnitude exceeds 1 are taken
/// to be in percent units and divided by 100; anything else is taken to be
/// a fraction already. The boundary is ambiguous: `"1"` and `"1%"` both
/// read as 1.0 (100%), and `"0.5%"` reads as 0.5 (50%).
pub fn parse_percentage(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

    if stripped.is_empty() {
        return 0.0;
    }

    let value = match stripped.replace(',', "").parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            warn!("coercing malformed percentage cell {:?} to 0", raw);
            return 0.0;
        }
    };

    if value.abs() > 1.0 {
        value / 100.0
    } else {
        value
    }
}

/// Parse a count cell (years, company counts). Negative or fractional
/// values are clamped and rounded.
pub fn parse_count(raw: &str) -> u32 {
    let value = parse_currency(raw);
    if value <= 0.0 {
        0
    } else {
        value.round().min(u32::MAX as f64) as u32
    }
}
