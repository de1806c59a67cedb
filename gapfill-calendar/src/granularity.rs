//! Granularity — the alignment unit for gap detection.
//!
//! Each granularity carries a canonical strftime pattern (used to decide
//! whether two points are "the same") and a calendar step unit (used to walk
//! from one point to the next).

use crate::error::DateError;
use chrono::{Duration, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Alignment unit for filling a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    Day,
    Month,
    Year,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Hour,
        Granularity::Day,
        Granularity::Month,
        Granularity::Year,
    ];

    /// Canonical strftime pattern at this granularity.
    pub fn pattern(self) -> &'static str {
        match self {
            Granularity::Hour => "%Y-%m-%d %H",
            Granularity::Day => "%Y-%m-%d",
            Granularity::Month => "%Y-%m",
            Granularity::Year => "%Y",
        }
    }

    /// Advance `dt` by exactly one calendar unit.
    pub fn step(self, dt: NaiveDateTime) -> Option<NaiveDateTime> {
        self.step_by(dt, 1)
    }

    /// Shift `dt` by `amount` calendar units (negative moves backwards).
    ///
    /// Month and year shifts keep the day-of-month when it exists in the
    /// target month and clamp it to the month's last day otherwise, so
    /// Jan 31 + 1 month is Feb 28 (or 29) and Feb 29 + 1 year is Feb 28.
    /// Returns `None` when the result is outside chrono's range.
    pub fn step_by(self, dt: NaiveDateTime, amount: i32) -> Option<NaiveDateTime> {
        match self {
            Granularity::Hour => dt.checked_add_signed(Duration::hours(i64::from(amount))),
            Granularity::Day => dt.checked_add_signed(Duration::days(i64::from(amount))),
            Granularity::Month => shift_months(dt, amount, 1),
            Granularity::Year => shift_months(dt, amount, 12),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }
}

fn shift_months(dt: NaiveDateTime, amount: i32, months_per_unit: u32) -> Option<NaiveDateTime> {
    let months = Months::new(amount.unsigned_abs().checked_mul(months_per_unit)?);
    if amount >= 0 {
        dt.checked_add_months(months)
    } else {
        dt.checked_sub_months(months)
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Granularity {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(Granularity::Hour),
            "day" => Ok(Granularity::Day),
            "month" => Ok(Granularity::Month),
            "year" => Ok(Granularity::Year),
            _ => Err(DateError::UnknownGranularity(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn hour_step_rolls_into_next_day() {
        assert_eq!(
            Granularity::Hour.step(at(2021, 12, 31, 23, 15)),
            Some(at(2022, 1, 1, 0, 15))
        );
    }

    #[test]
    fn day_step_respects_month_length() {
        assert_eq!(
            Granularity::Day.step(at(2021, 2, 28, 8, 0)),
            Some(at(2021, 3, 1, 8, 0))
        );
        assert_eq!(
            Granularity::Day.step(at(2024, 2, 28, 8, 0)),
            Some(at(2024, 2, 29, 8, 0))
        );
    }

    #[test]
    fn month_step_crosses_december() {
        assert_eq!(
            Granularity::Month.step(at(2021, 12, 14, 10, 30)),
            Some(at(2022, 1, 14, 10, 30))
        );
    }

    #[test]
    fn month_step_clamps_to_last_day() {
        assert_eq!(
            Granularity::Month.step(at(2021, 1, 31, 0, 0)),
            Some(at(2021, 2, 28, 0, 0))
        );
    }

    #[test]
    fn year_step_clamps_leap_day() {
        assert_eq!(
            Granularity::Year.step(at(2024, 2, 29, 0, 0)),
            Some(at(2025, 2, 28, 0, 0))
        );
    }

    #[test]
    fn negative_shift_moves_backwards() {
        assert_eq!(
            Granularity::Day.step_by(at(2022, 2, 1, 0, 0), -49),
            Some(at(2021, 12, 14, 0, 0))
        );
        assert_eq!(
            Granularity::Month.step_by(at(2022, 3, 31, 0, 0), -1),
            Some(at(2022, 2, 28, 0, 0))
        );
    }

    #[test]
    fn patterns_are_prefixes_of_each_other() {
        assert_eq!(Granularity::Year.pattern(), "%Y");
        for pair in Granularity::ALL.windows(2) {
            let (finer, coarser) = (pair[0].pattern(), pair[1].pattern());
            assert!(finer.starts_with(coarser), "{finer} vs {coarser}");
        }
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("DAY".parse::<Granularity>().unwrap(), Granularity::Day);
        assert_eq!(
            " month ".parse::<Granularity>().unwrap(),
            Granularity::Month
        );
        assert!(matches!(
            "week".parse::<Granularity>(),
            Err(DateError::UnknownGranularity(_))
        ));
    }

    #[test]
    fn display_matches_parse() {
        for g in Granularity::ALL {
            assert_eq!(g.to_string().parse::<Granularity>().unwrap(), g);
        }
    }
}
