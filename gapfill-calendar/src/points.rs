//! Point generation and canonical keys.
//!
//! `Points` walks from `start` towards `end` one calendar unit at a time.
//! The walk is overshoot-inclusive: `start` is always yielded, and a step is
//! taken whenever the previous point is still strictly before `end`, so the
//! last point yielded is the first one at or after `end`.

use crate::granularity::Granularity;
use chrono::NaiveDateTime;

/// Format `point` with the granularity's canonical pattern.
///
/// Two points are the same at a granularity iff their keys are equal. Keys
/// are compared, never parsed back.
pub fn canonical_key(point: NaiveDateTime, granularity: Granularity) -> String {
    point.format(granularity.pattern()).to_string()
}

/// Lazy iterator over the aligned points between two bounds.
#[derive(Debug, Clone)]
pub struct Points {
    next: Option<NaiveDateTime>,
    end: NaiveDateTime,
    granularity: Granularity,
}

impl Points {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, granularity: Granularity) -> Self {
        Self {
            next: Some(start),
            end,
            granularity,
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }
}

impl Iterator for Points {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<NaiveDateTime> {
        let current = self.next?;
        // A step out of chrono's range simply ends the walk.
        self.next = if current < self.end {
            self.granularity.step(current)
        } else {
            None
        };
        Some(current)
    }
}

impl std::iter::FusedIterator for Points {}

/// Collect every point from `start` to the first point at or after `end`.
///
/// The result is never empty and strictly increasing. `start <= end` is the
/// caller's responsibility; when `start >= end` only `start` is returned.
pub fn generate_points(
    start: NaiveDateTime,
    end: NaiveDateTime,
    granularity: Granularity,
) -> Vec<NaiveDateTime> {
    Points::new(start, end, granularity).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn end_on_step_boundary_is_included_exactly() {
        let points = generate_points(
            at(2021, 12, 1, 0, 0),
            at(2021, 12, 3, 0, 0),
            Granularity::Day,
        );
        assert_eq!(
            points,
            vec![
                at(2021, 12, 1, 0, 0),
                at(2021, 12, 2, 0, 0),
                at(2021, 12, 3, 0, 0),
            ]
        );
    }

    #[test]
    fn equal_bounds_yield_single_point() {
        let t = at(2021, 12, 1, 10, 0);
        assert_eq!(generate_points(t, t, Granularity::Hour), vec![t]);
    }

    #[test]
    fn unaligned_end_overshoots_by_one_step() {
        let points = generate_points(
            at(2021, 12, 1, 10, 0),
            at(2021, 12, 3, 9, 0),
            Granularity::Day,
        );
        assert_eq!(
            points,
            vec![
                at(2021, 12, 1, 10, 0),
                at(2021, 12, 2, 10, 0),
                at(2021, 12, 3, 10, 0),
            ]
        );
    }

    #[test]
    fn start_is_kept_even_when_unaligned() {
        let points = generate_points(
            at(2021, 11, 20, 7, 45),
            at(2022, 1, 1, 0, 0),
            Granularity::Month,
        );
        assert_eq!(points[0], at(2021, 11, 20, 7, 45));
        assert_eq!(points.last().copied(), Some(at(2022, 1, 20, 7, 45)));
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn start_after_end_yields_only_start() {
        let points = generate_points(
            at(2022, 1, 1, 0, 0),
            at(2021, 1, 1, 0, 0),
            Granularity::Year,
        );
        assert_eq!(points, vec![at(2022, 1, 1, 0, 0)]);
    }

    #[test]
    fn month_walk_carries_clamped_day_forward() {
        // Each step starts from the previous point, so a clamp sticks.
        let points = generate_points(
            at(2021, 1, 31, 0, 0),
            at(2021, 4, 1, 0, 0),
            Granularity::Month,
        );
        assert_eq!(
            points,
            vec![
                at(2021, 1, 31, 0, 0),
                at(2021, 2, 28, 0, 0),
                at(2021, 3, 28, 0, 0),
                at(2021, 4, 28, 0, 0),
            ]
        );
    }

    #[test]
    fn fifty_day_span() {
        let end = at(2022, 2, 1, 10, 30);
        let start = Granularity::Day.step_by(end, -49).unwrap();
        let points = generate_points(start, end, Granularity::Day);
        assert_eq!(points.len(), 50);
        assert_eq!(points[0], at(2021, 12, 14, 10, 30));
        assert_eq!(points[49], end);
    }

    #[test]
    fn canonical_keys_ignore_finer_fields() {
        let a = at(2021, 12, 14, 10, 30);
        let b = at(2021, 12, 14, 23, 59);
        assert_eq!(canonical_key(a, Granularity::Day), "2021-12-14");
        assert_eq!(
            canonical_key(a, Granularity::Day),
            canonical_key(b, Granularity::Day)
        );
        assert_ne!(
            canonical_key(a, Granularity::Hour),
            canonical_key(b, Granularity::Hour)
        );
        assert_eq!(canonical_key(a, Granularity::Hour), "2021-12-14 10");
        assert_eq!(canonical_key(a, Granularity::Month), "2021-12");
        assert_eq!(canonical_key(a, Granularity::Year), "2021");
    }

    fn arb_datetime() -> impl Strategy<Value = NaiveDateTime> {
        (1990i32..2040, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60)
            .prop_map(|(y, m, d, h, min)| at(y, m, d, h, min))
    }

    fn arb_granularity() -> impl Strategy<Value = Granularity> {
        prop::sample::select(Granularity::ALL.to_vec())
    }

    proptest! {
        /// First point is start, points strictly increase, and only the last
        /// point may be at or after end.
        #[test]
        fn walk_is_overshoot_inclusive(
            start in arb_datetime(),
            span_hours in 0i64..2000,
            granularity in arb_granularity(),
        ) {
            let end = start + chrono::Duration::hours(span_hours);
            let points = generate_points(start, end, granularity);

            prop_assert_eq!(points[0], start);
            for window in points.windows(2) {
                prop_assert!(window[0] < window[1]);
                prop_assert!(window[0] < end);
            }
            prop_assert!(*points.last().unwrap() >= end);
        }
    }
}
