//! Gap filler — completes a sparse series at a granularity.
//!
//! For every point generated between `start` and `end` (see
//! [`gapfill_calendar::Points`]) the filler looks for an existing record with
//! the same canonical key. Each miss gets a new record: built by the
//! factory, stamped with the point's year/month/day/hour, handed to the
//! generator, then appended to the caller's vector. The call returns a copy
//! of the grown vector sorted by `YYYY-MM-DD HH:mm`.
//!
//! Mutation is append-only and happens in point order, so a generator error
//! leaves the records synthesized before it in place (unsorted) and
//! propagates unchanged. Duplicate input records are never merged.

use crate::error::FillError;
use crate::factory::RecordFactory;
use crate::record::Record;
use chrono::{Datelike, NaiveDateTime, Timelike};
use gapfill_calendar::{canonical_key, Granularity, Points};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Fill gaps with an infallible generator.
///
/// Appends one record per missing point to `records` and returns the grown
/// series sorted by [`Record::date_time_string`]. Synthesized records get
/// year, month, day and hour from the point; the minute stays whatever the
/// factory produced.
pub fn fill_blank<R, G>(
    records: &mut Vec<R>,
    granularity: Granularity,
    start: NaiveDateTime,
    end: NaiveDateTime,
    factory: &RecordFactory<R>,
    mut generator: G,
) -> Result<Vec<R>, FillError>
where
    R: Record + Clone,
    G: FnMut(&mut R),
{
    try_fill_blank(records, granularity, start, end, factory, |record: &mut R| {
        generator(record);
        Ok::<(), FillError>(())
    })
}

/// Fill gaps with a fallible generator.
///
/// The generator's error type must absorb [`FillError`] so that validation
/// and construction failures share the return channel. A generator error is
/// returned as-is; no sort happens and records already appended stay put.
pub fn try_fill_blank<R, G, E>(
    records: &mut Vec<R>,
    granularity: Granularity,
    start: NaiveDateTime,
    end: NaiveDateTime,
    factory: &RecordFactory<R>,
    generator: G,
) -> Result<Vec<R>, E>
where
    R: Record + Clone,
    G: FnMut(&mut R) -> Result<(), E>,
    E: From<FillError>,
{
    run(
        records,
        Some(granularity),
        Some(start),
        Some(end),
        factory,
        generator,
    )
}

/// Fill configuration with optional pieces, validated at fill time.
#[derive(Debug)]
pub struct GapFiller<R> {
    factory: RecordFactory<R>,
    granularity: Option<Granularity>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
}

impl<R> GapFiller<R> {
    pub fn new(factory: RecordFactory<R>) -> Self {
        Self {
            factory,
            granularity: None,
            start: None,
            end: None,
        }
    }

    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }

    pub fn start(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn range(self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.start(start).end(end)
    }

    pub(crate) fn with_parts(
        factory: RecordFactory<R>,
        granularity: Option<Granularity>,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            factory,
            granularity,
            start,
            end,
        }
    }
}

impl<R: Record + Clone> GapFiller<R> {
    /// See [`fill_blank`]. Missing granularity or bounds fail with
    /// [`FillError::InvalidArgument`].
    pub fn fill<G>(&self, records: &mut Vec<R>, mut generator: G) -> Result<Vec<R>, FillError>
    where
        G: FnMut(&mut R),
    {
        self.try_fill(records, |record: &mut R| {
            generator(record);
            Ok::<(), FillError>(())
        })
    }

    /// See [`try_fill_blank`].
    pub fn try_fill<G, E>(&self, records: &mut Vec<R>, generator: G) -> Result<Vec<R>, E>
    where
        G: FnMut(&mut R) -> Result<(), E>,
        E: From<FillError>,
    {
        run(
            records,
            self.granularity,
            self.start,
            self.end,
            &self.factory,
            generator,
        )
    }
}

fn run<R, G, E>(
    records: &mut Vec<R>,
    granularity: Option<Granularity>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    factory: &RecordFactory<R>,
    generator: G,
) -> Result<Vec<R>, E>
where
    R: Record + Clone,
    G: FnMut(&mut R) -> Result<(), E>,
    E: From<FillError>,
{
    let (granularity, start, end) = validate(records.len(), granularity, start, end)?;
    synthesize(records, granularity, start, end, factory, generator)?;
    Ok(sorted(records))
}

fn validate(
    record_count: usize,
    granularity: Option<Granularity>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Result<(Granularity, NaiveDateTime, NaiveDateTime), FillError> {
    if record_count == 0 {
        return Err(FillError::invalid("records is empty"));
    }
    let granularity = granularity.ok_or_else(|| FillError::invalid("granularity is missing"))?;
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(FillError::invalid("start or end is missing")),
    };
    if start > end {
        return Err(FillError::invalid(format!(
            "start {start} should not be after end {end}"
        )));
    }
    Ok((granularity, start, end))
}

fn synthesize<R, G, E>(
    records: &mut Vec<R>,
    granularity: Granularity,
    start: NaiveDateTime,
    end: NaiveDateTime,
    factory: &RecordFactory<R>,
    mut generator: G,
) -> Result<usize, E>
where
    R: Record,
    G: FnMut(&mut R) -> Result<(), E>,
    E: From<FillError>,
{
    // Keys of every record present so far, synthesized ones included.
    let mut present: HashSet<String> = records
        .iter()
        .filter_map(|record| record.time_point().key(granularity))
        .collect();

    let mut points = 0usize;
    let mut synthesized = 0usize;
    for point in Points::new(start, end, granularity) {
        points += 1;
        let key = canonical_key(point, granularity);
        if present.contains(&key) {
            continue;
        }

        let mut record = factory.create().map_err(FillError::from)?;
        stamp(&mut record, point);
        generator(&mut record)?;

        trace!(%key, "synthesized record");
        if let Some(own) = record.time_point().key(granularity) {
            present.insert(own);
        }
        records.push(record);
        synthesized += 1;
    }

    debug!(
        %granularity,
        %start,
        %end,
        points,
        synthesized,
        total = records.len(),
        "filled gaps"
    );
    Ok(synthesized)
}

/// Minute is deliberately left alone.
fn stamp<R: Record>(record: &mut R, point: NaiveDateTime) {
    record.set_year(point.year());
    record.set_month(point.month());
    record.set_day(point.day());
    record.set_hour(point.hour());
}

fn sorted<R: Record + Clone>(records: &[R]) -> Vec<R> {
    let mut out = records.to_vec();
    out.sort_by_cached_key(|record| record.date_time_string());
    out
}
