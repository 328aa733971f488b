//! Date expansion: years, year ranges, and era aliases become absolute
//! inclusive UTC intervals; single dates become midnight UTC timestamps.
//!
//! Expansion is pure and deterministic. Arithmetically invalid calendar
//! dates (e.g. 2/30/77) surface as `DateInvalid` errors.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::error::QueryError;

use super::ast::{Date, DateRange, EraAlias};
use super::ir::ResolvedDateRange;

/// Expand a date range into an absolute interval. Returns `None` when the
/// range has neither an era nor a start year.
pub fn expand_range(dr: &DateRange) -> Result<Option<ResolvedDateRange>, QueryError> {
    if let Some(era) = dr.era {
        return Ok(Some(expand_era(era)?));
    }
    let Some(start) = &dr.start else {
        return Ok(None);
    };
    let start_ts = year_start(start.year)?;
    let end_year = dr.end.as_ref().map_or(start.year, |d| d.year);
    Ok(Some(ResolvedDateRange {
        start: start_ts,
        end: year_end(end_year)?,
    }))
}

/// Expand an era alias to its fixed closed interval.
pub fn expand_era(era: EraAlias) -> Result<ResolvedDateRange, QueryError> {
    let (start, end) = match era {
        EraAlias::Primal => ((1965, 1, 1), (1969, 12, 31)),
        EraAlias::Europe72 => ((1972, 3, 1), (1972, 5, 31)),
        EraAlias::WallOfSound => ((1974, 1, 1), (1974, 12, 31)),
        EraAlias::Hiatus => ((1975, 1, 1), (1975, 12, 31)),
        EraAlias::Brent => ((1979, 1, 1), (1990, 12, 31)),
        EraAlias::Vince => ((1990, 1, 1), (1995, 12, 31)),
    };
    Ok(ResolvedDateRange {
        start: midnight(start.0, start.1, start.2)?,
        end: day_end(end.0, end.1, end.2)?,
    })
}

/// Expand a single date to midnight UTC. Missing components default to
/// 1970 (year) and 1 (month/day).
pub fn expand_date(date: &Date) -> Result<DateTime<Utc>, QueryError> {
    let year = if date.year == 0 { 1970 } else { date.year };
    let month = if date.month == 0 { 1 } else { date.month };
    let day = if date.day == 0 { 1 } else { date.day };
    midnight(year, month, day)
}

fn midnight(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>, QueryError> {
    let d = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| QueryError::date_invalid(format!("{year:04}-{month:02}-{day:02}")))?;
    Ok(Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).unwrap_or_default()))
}

fn day_end(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>, QueryError> {
    let d = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| QueryError::date_invalid(format!("{year:04}-{month:02}-{day:02}")))?;
    Ok(Utc.from_utc_datetime(&d.and_hms_opt(23, 59, 59).unwrap_or_default()))
}

fn year_start(year: i32) -> Result<DateTime<Utc>, QueryError> {
    midnight(year, 1, 1)
}

fn year_end(year: i32) -> Result<DateTime<Utc>, QueryError> {
    day_end(year, 12, 31)
}
