//! crates/exercise_tracker_core/src/query.rs
//!
//! The exercise-log query pipeline and the date helpers it depends on.
//!
//! Two deliberately different date policies live here and must not be
//! unified: the write path is permissive (a bad date silently becomes
//! "today"), while the query path is strict (a bad `from`/`to` bound is
//! simply not applied). Both backings share this logic, so a log query
//! behaves identically regardless of where the exercises are stored.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::domain::Exercise;

//=========================================================================================
// Date Helpers
//=========================================================================================

/// Permissive write-path date acceptance: a missing or unparsable date
/// becomes `today`. No error is ever raised for a bad date on write.
///
/// Accepts plain `YYYY-MM-DD` as well as an RFC 3339 timestamp, whose
/// time-of-day is discarded (only the calendar day is kept).
pub fn parse_date_or(input: Option<&str>, today: NaiveDate) -> NaiveDate {
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return today;
    };
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive();
    }
    today
}

/// Convenience wrapper over [`parse_date_or`] using the current UTC
/// calendar day as "today".
pub fn parse_date_or_today(input: Option<&str>) -> NaiveDate {
    parse_date_or(input, Utc::now().date_naive())
}

/// Strict query-path validation of a `YYYY-MM-DD` filter bound.
///
/// Parses the string as a calendar date, then re-derives year, month and day
/// from the parsed date and compares them against the numeric components
/// obtained by splitting the original string on `-`. The component compare
/// rejects day-of-month values a lenient parser would silently roll over
/// (`2024-02-30` must not become March 1st) as well as strings with extra
/// components.
pub fn is_valid_iso_date(input: &str) -> bool {
    let Ok(parsed) = NaiveDate::parse_from_str(input, "%Y-%m-%d") else {
        return false;
    };
    let mut parts = input.split('-');
    let (Some(y), Some(m), Some(d), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let (Ok(y), Ok(m), Ok(d)) = (y.parse::<i32>(), m.parse::<u32>(), d.parse::<u32>()) else {
        return false;
    };
    parsed.year() == y && parsed.month() == m && parsed.day() == d
}

/// Parses an optional `limit` query parameter. Only a numeric value greater
/// than zero produces a cap; anything else (absent, non-numeric, zero,
/// negative) is ignored rather than rejected.
pub fn parse_limit(input: Option<&str>) -> Option<usize> {
    let n = input?.trim().parse::<f64>().ok()?;
    if n.is_finite() && n > 0.0 {
        Some(n as usize)
    } else {
        None
    }
}

//=========================================================================================
// Log Query
//=========================================================================================

/// Produces the filtered, sorted, capped view of a user's exercise log.
///
/// Works on a copy of the stored collection; the input is never mutated.
/// `from`/`to` bounds are inclusive and applied only when they pass
/// [`is_valid_iso_date`]. The sort is stable, so exercises sharing a date
/// keep their insertion order. An empty result is valid, not an error
/// (including when `from > to`).
pub fn query_log(
    exercises: &[Exercise],
    from: Option<&str>,
    to: Option<&str>,
    limit: Option<&str>,
) -> Vec<Exercise> {
    let mut log: Vec<Exercise> = exercises.to_vec();

    if let Some(from) = from.filter(|s| is_valid_iso_date(s)) {
        // Validated above, so the parse cannot fail.
        if let Ok(bound) = NaiveDate::parse_from_str(from, "%Y-%m-%d") {
            log.retain(|e| e.date >= bound);
        }
    }
    if let Some(to) = to.filter(|s| is_valid_iso_date(s)) {
        if let Ok(bound) = NaiveDate::parse_from_str(to, "%Y-%m-%d") {
            log.retain(|e| e.date <= bound);
        }
    }

    log.sort_by_key(|e| e.date);

    if let Some(cap) = parse_limit(limit) {
        log.truncate(cap);
    }

    log
}

/// Renders a date as the human-readable day string used in responses,
/// e.g. `"Thu Jan 05 2023"`. Output-only; never stored or compared.
pub fn render_day(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

//=========================================================================================
// Tests
//=========================================================================================
