//! Records — caller-owned values stamped with a point in time.
//!
//! Any type can take part in gap filling by implementing [`Record`], which
//! only asks for access to an embedded [`TimePoint`]. [`TimedRecord`] is a
//! ready-made record for callers that just need a payload next to the time.

use chrono::{Datelike, NaiveDateTime, Timelike};
use gapfill_calendar::{canonical_key, dates, Granularity};
use serde::{Deserialize, Serialize};

/// A point in time decomposed into calendar fields.
///
/// Fields are stored as written and are not validated; an out-of-range
/// value (month 13, day 0, minute 75) rolls into the neighbouring unit when
/// the point is read back as a date-time. The all-zero default is what a
/// freshly constructed record carries before it is stamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimePoint {
    pub year: i32,
    /// 1–12
    pub month: u32,
    /// 1–31
    pub day: u32,
    /// 0–23
    #[serde(default)]
    pub hour: u32,
    /// 0–59
    #[serde(default)]
    pub minute: u32,
}

impl TimePoint {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
        }
    }

    /// A date with hour and minute at zero.
    pub fn ymd(year: i32, month: u32, day: u32) -> Self {
        Self::new(year, month, day, 0, 0)
    }

    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Self::new(dt.year(), dt.month(), dt.day(), dt.hour(), dt.minute())
    }

    /// Read the fields back as a date-time, rolling overflow leniently.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        dates::lenient_datetime(self.year, self.month, self.day, self.hour, self.minute)
    }

    /// Canonical key of this point at `granularity`, or `None` when the
    /// fields fall outside the representable calendar.
    pub fn key(&self, granularity: Granularity) -> Option<String> {
        self.to_datetime().map(|dt| canonical_key(dt, granularity))
    }

    /// `YYYY-MM-DD HH:mm` built from the raw fields.
    ///
    /// This is the total sort key for filled output. Fixed-width zero padding
    /// makes lexicographic order chronological for in-range fields.
    pub fn date_time_string(&self) -> String {
        format!(
            "{:04}-{:02}-{:02} {:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }
}

/// Capability interface for values the gap filler can inspect and stamp.
pub trait Record {
    fn time_point(&self) -> &TimePoint;

    fn time_point_mut(&mut self) -> &mut TimePoint;

    fn year(&self) -> i32 {
        self.time_point().year
    }

    fn set_year(&mut self, year: i32) {
        self.time_point_mut().year = year;
    }

    fn month(&self) -> u32 {
        self.time_point().month
    }

    fn set_month(&mut self, month: u32) {
        self.time_point_mut().month = month;
    }

    fn day(&self) -> u32 {
        self.time_point().day
    }

    fn set_day(&mut self, day: u32) {
        self.time_point_mut().day = day;
    }

    fn hour(&self) -> u32 {
        self.time_point().hour
    }

    fn set_hour(&mut self, hour: u32) {
        self.time_point_mut().hour = hour;
    }

    fn minute(&self) -> u32 {
        self.time_point().minute
    }

    fn set_minute(&mut self, minute: u32) {
        self.time_point_mut().minute = minute;
    }

    fn date_time_string(&self) -> String {
        self.time_point().date_time_string()
    }
}

impl Record for TimePoint {
    fn time_point(&self) -> &TimePoint {
        self
    }

    fn time_point_mut(&mut self) -> &mut TimePoint {
        self
    }
}

/// A time point with an arbitrary caller payload.
///
/// Serializes flat: `{"year":2021,"month":12,"day":14,"hour":0,"minute":0,"sum":1}`
/// for a payload struct with a `sum` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimedRecord<P> {
    #[serde(flatten)]
    pub time: TimePoint,
    #[serde(flatten)]
    pub payload: P,
}

impl<P> TimedRecord<P> {
    pub fn new(time: TimePoint, payload: P) -> Self {
        Self { time, payload }
    }
}

impl<P> Record for TimedRecord<P> {
    fn time_point(&self) -> &TimePoint {
        &self.time
    }

    fn time_point_mut(&mut self) -> &mut TimePoint {
        &mut self.time
    }
}
