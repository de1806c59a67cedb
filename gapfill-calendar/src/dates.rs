//! Date helpers: formatting, parsing, lenient reconstruction, boundaries.
//!
//! Every value here is a `NaiveDateTime` interpreted as local wall-clock
//! time. Inputs that carry an explicit UTC marker (`...Z`) or an epoch
//! timestamp are converted to local time on the way in.

use crate::error::DateError;
use chrono::format::{parse, Item, Parsed, StrftimeItems};
use chrono::{
    DateTime, Datelike, Days, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone, Weekday,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;

pub const PATTERN_ON_SECOND: &str = "%Y-%m-%d %H:%M:%S";
pub const PATTERN_ON_MINUTE: &str = "%Y-%m-%d %H:%M";
pub const PATTERN_ON_HOUR: &str = "%Y-%m-%d %H";
pub const PATTERN_ON_DAY: &str = "%Y-%m-%d";
pub const PATTERN_ON_MONTH: &str = "%Y-%m";
pub const PATTERN_ON_YEAR: &str = "%Y";

const PATTERN_ISO_ON_SECOND: &str = "%Y-%m-%dT%H:%M:%SZ";
const PATTERN_ISO: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

// ── Formatting and parsing ───────────────────────────────────────────

fn compile(pattern: &str) -> Result<Vec<Item<'_>>, DateError> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(DateError::InvalidPattern(pattern.to_string()));
    }
    Ok(items)
}

/// Format `dt` with a strftime pattern.
pub fn format(dt: NaiveDateTime, pattern: &str) -> Result<String, DateError> {
    let items = compile(pattern)?;
    let mut out = String::new();
    // Offset specifiers (%z, %Z) have nothing to render for a naive value.
    write!(out, "{}", dt.format_with_items(items.into_iter()))
        .map_err(|_| DateError::InvalidPattern(pattern.to_string()))?;
    Ok(out)
}

/// Parse `text` with an explicit strftime pattern.
///
/// Fields the pattern does not mention default to the start of the period:
/// `2021-12` with `%Y-%m` parses to `2021-12-01 00:00:00`. When the pattern
/// parses an offset (`%z`, `%:z`), the instant is converted to local time.
pub fn parse_with_pattern(text: &str, pattern: &str) -> Result<NaiveDateTime, DateError> {
    let items = compile(pattern)?;
    let parse_error = |reason: String| DateError::Parse {
        input: text.to_string(),
        pattern: pattern.to_string(),
        reason,
    };

    let mut parsed = Parsed::new();
    parse(&mut parsed, text, items.iter()).map_err(|e| parse_error(e.to_string()))?;

    // Setters only fill empty slots; a field already parsed keeps its value.
    let _ = parsed.set_month(1);
    let _ = parsed.set_day(1);
    let _ = parsed.set_hour(0);
    let _ = parsed.set_minute(0);
    let _ = parsed.set_second(0);

    if parsed.offset.is_some() {
        // An explicit offset pins an instant; report it as local time.
        let dt = parsed
            .to_datetime()
            .map_err(|e| parse_error(e.to_string()))?;
        return Ok(utc_to_local(dt.naive_utc()));
    }
    parsed
        .to_naive_datetime_with_offset(0)
        .map_err(|e| parse_error(e.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AutoFormat {
    YearMonth,
    Date,
    DateMinute,
    DateSecond,
    IsoSecondUtc,
    IsoMillisUtc,
    EpochNanos,
}

/// Recognized layouts, tried in order.
static AUTO_FORMATS: Lazy<Vec<(AutoFormat, Regex)>> = Lazy::new(|| {
    vec![
        (
            AutoFormat::YearMonth,
            Regex::new(r"^\d{4}-\d{1,2}$").unwrap(),
        ),
        (
            AutoFormat::Date,
            Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").unwrap(),
        ),
        (
            AutoFormat::DateMinute,
            Regex::new(r"^\d{4}-\d{1,2}-\d{1,2} \d{1,2}:\d{1,2}$").unwrap(),
        ),
        (
            AutoFormat::DateSecond,
            Regex::new(r"^\d{4}-\d{1,2}-\d{1,2} \d{1,2}:\d{1,2}:\d{1,2}$").unwrap(),
        ),
        (
            AutoFormat::IsoSecondUtc,
            Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}T\d{1,2}:\d{1,2}:\d{1,2}Z$").unwrap(),
        ),
        (
            AutoFormat::IsoMillisUtc,
            Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}T\d{1,2}:\d{1,2}:\d{1,2}\.\d{1,3}Z$").unwrap(),
        ),
        (
            AutoFormat::EpochNanos,
            Regex::new(r"^[0-9]+\.[0-9]{1,9}$").unwrap(),
        ),
    ]
});

/// Parse `text` by detecting its layout.
///
/// Accepted layouts: `yyyy-M`, `yyyy-M-d`, `yyyy-M-d H:m`, `yyyy-M-d H:m:s`,
/// `yyyy-M-dTH:m:sZ`, `yyyy-M-dTH:m:s.SSSZ` and `seconds.nanos` since the
/// epoch (the fraction is an integer nanosecond count, so `5.3` is five
/// seconds and three nanoseconds). Blank input yields `Ok(None)`.
pub fn parse_auto(text: &str) -> Result<Option<NaiveDateTime>, DateError> {
    let source = text.trim();
    if source.is_empty() {
        return Ok(None);
    }

    let format = AUTO_FORMATS
        .iter()
        .find(|(_, regex)| regex.is_match(source))
        .map(|(format, _)| *format)
        .ok_or_else(|| DateError::UnrecognizedFormat(source.to_string()))?;

    let dt = match format {
        AutoFormat::YearMonth => parse_with_pattern(source, PATTERN_ON_MONTH)?,
        AutoFormat::Date => parse_with_pattern(source, PATTERN_ON_DAY)?,
        AutoFormat::DateMinute => parse_with_pattern(source, PATTERN_ON_MINUTE)?,
        AutoFormat::DateSecond => parse_with_pattern(source, PATTERN_ON_SECOND)?,
        AutoFormat::IsoSecondUtc => {
            utc_to_local(parse_with_pattern(source, PATTERN_ISO_ON_SECOND)?)
        }
        AutoFormat::IsoMillisUtc => utc_to_local(parse_with_pattern(source, PATTERN_ISO)?),
        AutoFormat::EpochNanos => parse_epoch(source)?,
    };
    Ok(Some(dt))
}

fn parse_epoch(source: &str) -> Result<NaiveDateTime, DateError> {
    let out_of_range = || DateError::OutOfRange(source.to_string());
    let (secs, nanos) = source
        .split_once('.')
        .ok_or_else(|| DateError::UnrecognizedFormat(source.to_string()))?;
    let secs: i64 = secs.parse().map_err(|_| out_of_range())?;
    let nanos: u32 = nanos.parse().map_err(|_| out_of_range())?;
    let utc = DateTime::from_timestamp(secs, nanos).ok_or_else(out_of_range)?;
    Ok(utc_to_local(utc.naive_utc()))
}

fn utc_to_local(naive_utc: NaiveDateTime) -> NaiveDateTime {
    Local.from_utc_datetime(&naive_utc).naive_local()
}

// ── Lenient reconstruction ───────────────────────────────────────────

/// Build a date-time from raw fields, rolling out-of-range values into the
/// next larger unit.
///
/// Month 13 is January of the next year, month 0 December of the previous
/// one, day 0 the last day of the previous month, hour 24 midnight of the
/// next day. Returns `None` only when the result is outside chrono's range.
pub fn lenient_datetime(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> Option<NaiveDateTime> {
    let total_months = i64::from(year) * 12 + i64::from(month) - 1;
    let y = i32::try_from(total_months.div_euclid(12)).ok()?;
    let m = u32::try_from(total_months.rem_euclid(12) + 1).ok()?;

    NaiveDate::from_ymd_opt(y, m, 1)?
        .and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::days(i64::from(day) - 1))?
        .checked_add_signed(Duration::hours(i64::from(hour)))?
        .checked_add_signed(Duration::minutes(i64::from(minute)))
}

// ── Boundaries ───────────────────────────────────────────────────────

/// 23:59:59. `NaiveTime` arithmetic wraps around midnight.
fn last_second() -> NaiveTime {
    NaiveTime::MIN - Duration::seconds(1)
}

fn month_start(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}

fn year_start(date: NaiveDate) -> Option<NaiveDate> {
    date.with_ordinal(1)
}

fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    let offset = date.weekday().num_days_from_monday();
    date.checked_sub_days(Days::new(u64::from(offset)))
}

pub fn start_of_day(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date().and_time(NaiveTime::MIN)
}

pub fn end_of_day(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date().and_time(last_second())
}

// The remaining boundaries return `None` when the boundary date falls
// outside chrono's representable range.

pub fn first_day_of_month(dt: NaiveDateTime) -> Option<NaiveDateTime> {
    Some(month_start(dt.date())?.and_time(NaiveTime::MIN))
}

pub fn last_day_of_month(dt: NaiveDateTime) -> Option<NaiveDateTime> {
    let first = month_start(dt.date())?;
    let last = match first.checked_add_months(Months::new(1)) {
        Some(next) => next.pred_opt()?,
        // December of the last representable year.
        None => NaiveDate::from_ymd_opt(first.year(), 12, 31)?,
    };
    Some(last.and_time(last_second()))
}

/// Monday 00:00:00 of the week containing `dt`.
pub fn first_day_of_week(dt: NaiveDateTime) -> Option<NaiveDateTime> {
    Some(week_start(dt.date())?.and_time(NaiveTime::MIN))
}

/// Sunday 23:59:59 of the week containing `dt`.
pub fn last_day_of_week(dt: NaiveDateTime) -> Option<NaiveDateTime> {
    let sunday = week_start(dt.date())?.checked_add_days(Days::new(6))?;
    Some(sunday.and_time(last_second()))
}

pub fn first_day_of_year(dt: NaiveDateTime) -> Option<NaiveDateTime> {
    Some(year_start(dt.date())?.and_time(NaiveTime::MIN))
}

pub fn last_day_of_year(dt: NaiveDateTime) -> Option<NaiveDateTime> {
    let last = NaiveDate::from_ymd_opt(dt.year(), 12, 31)?;
    Some(last.and_time(last_second()))
}

/// Local midnight at the start of tomorrow.
pub fn tomorrow() -> Option<NaiveDateTime> {
    let today = Local::now().date_naive();
    Some(today.succ_opt()?.and_time(NaiveTime::MIN))
}

// ── Week and day queries ─────────────────────────────────────────────

/// ISO-8601 week number (weeks start on Monday).
pub fn week_of_year(dt: NaiveDateTime) -> u32 {
    dt.iso_week().week()
}

pub fn day_of_week(dt: NaiveDateTime) -> Weekday {
    dt.weekday()
}

/// The day `day` (Monday = 1 .. Sunday = 7) of the week containing `dt`,
/// keeping the time of day.
pub fn day_in_same_week(dt: NaiveDateTime, day: u32) -> Result<NaiveDateTime, DateError> {
    if !(1..=7).contains(&day) {
        return Err(DateError::InvalidWeekday(day));
    }
    let offset = Days::new(u64::from(day - 1));
    let date = week_start(dt.date())
        .and_then(|monday| monday.checked_add_days(offset))
        .ok_or_else(|| DateError::OutOfRange(dt.to_string()))?;
    Ok(date.and_time(dt.time()))
}

pub fn is_same_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date()
}

/// Calendar days from `start` to `end`, ignoring the time of day.
pub fn days_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end.date() - start.date()).num_days()
}
