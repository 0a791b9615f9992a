//! Release year derivation

use chrono::{Datelike, NaiveDate};

/// Parse a release date cell.
///
/// Accepts `YYYY-MM-DD` (optionally followed by a time), `YYYY-MM` and
/// `YYYY`; partial dates resolve to the first day of the period.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);

    let bytes = date_part.as_bytes();
    if bytes.len() < 4 || !bytes[..4].iter().all(u8::is_ascii_digit) {
        return None;
    }

    match date_part.len() {
        4 => NaiveDate::parse_from_str(&format!("{}-01-01", date_part), "%Y-%m-%d").ok(),
        7 => NaiveDate::parse_from_str(&format!("{}-01", date_part), "%Y-%m-%d").ok(),
        _ => NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok(),
    }
}

/// Parse a raw numeric year cell (`2019` or `2019.0`). Zero means unknown.
pub fn parse_raw_year(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let year = match raw.parse::<i64>() {
        Ok(year) => year,
        Err(_) => {
            let value = raw.parse::<f64>().ok()?;
            if !value.is_finite() || value.fract() != 0.0 {
                return None;
            }
            value as i64
        }
    };
    (year != 0).then_some(year)
}

/// Derive `release_year` from whichever source cells exist.
///
/// A non-empty release date takes precedence; if it cannot be parsed the
/// year is unknown. Without a date the raw year column is used.
pub fn derive_release_year(release_date: Option<&str>, raw_year: Option<&str>) -> Option<i64> {
    match release_date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(date) => parse_release_date(date)
            .map(|d| i64::from(d.year()))
            .filter(|year| *year != 0),
        None => raw_year.and_then(parse_raw_year),
    }
}
