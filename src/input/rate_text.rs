//! Rate text parsing
//!
//! Accepted notations, checked in this order:
//! - `"25bps"` → 0.25 (basis points, case-insensitive suffix)
//! - `"0.25%"` → 0.25 (percent taken verbatim)
//! - `"25"`    → 0.25 (bare numbers are basis points)
//!
//! Empty text parses to 0.0.

use crate::error::RateParseError;

/// Parse rate text into percentage points
pub fn parse_rate(text: &str) -> Result<f64, RateParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0.0);
    }

    if text.len() >= 3 && text.is_char_boundary(text.len() - 3) {
        let (number, suffix) = text.split_at(text.len() - 3);
        if suffix.eq_ignore_ascii_case("bps") {
            return parse_number(number)
                .map(|bps| bps / 100.0)
                .ok_or_else(|| RateParseError::Bps(text.to_string()));
        }
    }

    if let Some(number) = text.strip_suffix('%') {
        return parse_number(number).ok_or_else(|| RateParseError::Percent(text.to_string()));
    }

    parse_number(text)
        .map(|bps| bps / 100.0)
        .ok_or_else(|| RateParseError::Numeric(text.to_string()))
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
