//! Shared utility functions for the ERCOT client

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use scraper::Selector;

use crate::fetch_error::FetchError;

/// Round an instant down to the nearest preceding 5-minute boundary
///
/// Report filenames are minute-quantized, so caller-supplied instants are aligned
/// before the date token is derived. Seconds and sub-seconds are dropped.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use ercot_grid_client::utils::floor_to_five_minutes;
///
/// let t = Utc.with_ymd_and_hms(2026, 10, 19, 14, 37, 52).unwrap();
/// assert_eq!(floor_to_five_minutes(t), Utc.with_ymd_and_hms(2026, 10, 19, 14, 35, 0).unwrap());
/// ```
pub fn floor_to_five_minutes(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .duration_trunc(TimeDelta::minutes(5))
        .unwrap_or(instant)
}

/// Round an instant down to the start of its hour
pub fn floor_to_hour(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .duration_trunc(TimeDelta::hours(1))
        .unwrap_or(instant)
}

/// Parse a numeric table cell, tolerating thousands separators and padding
pub fn parse_number(value: &str) -> Result<f64, FetchError> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    let number = cleaned
        .parse::<f64>()
        .map_err(|e| FetchError::NumberError(format!("'{}': {}", value.trim(), e)))?;
    if !number.is_finite() {
        return Err(FetchError::NumberError(format!("'{}' is not finite", value.trim())));
    }
    Ok(number)
}

/// Compile a CSS selector, reporting a bad one as a parse error
pub fn selector(css: &str) -> Result<Selector, FetchError> {
    Selector::parse(css).map_err(|e| FetchError::ParseError(format!("invalid selector '{css}': {e:?}")))
}
