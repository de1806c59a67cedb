//! Gapfill Core — completes sparse time series.
//!
//! Given records that exist for only some periods, the filler makes every
//! hour, day, month or year between two bounds present, synthesizing the
//! missing ones through a caller-supplied generator:
//! - `Record` / `TimePoint` — the capability a record type must offer
//! - `RecordFactory` — explicit construction of new records
//! - `fill_blank` / `try_fill_blank` / `GapFiller` — the fill itself
//! - `FillConfig` — TOML configuration for a filler
//!
//! ```
//! use chrono::NaiveDate;
//! use gapfill_core::{fill_blank, Granularity, Record, RecordFactory, TimePoint, TimedRecord};
//!
//! let mut series = vec![TimedRecord::new(TimePoint::ymd(2021, 12, 2), 5u32)];
//! let start = NaiveDate::from_ymd_opt(2021, 12, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let end = NaiveDate::from_ymd_opt(2021, 12, 3).unwrap().and_hms_opt(0, 0, 0).unwrap();
//!
//! let filled = fill_blank(
//!     &mut series,
//!     Granularity::Day,
//!     start,
//!     end,
//!     &RecordFactory::from_default(),
//!     |record| record.payload = 0,
//! )
//! .unwrap();
//!
//! let days: Vec<u32> = filled.iter().map(|r| r.day()).collect();
//! assert_eq!(days, vec![1, 2, 3]);
//! ```

pub mod config;
pub mod error;
pub mod factory;
pub mod filler;
pub mod record;

pub use config::{ConfigError, FillConfig, ResolvedConfig};
pub use error::{ConstructionError, FillError};
pub use factory::RecordFactory;
pub use filler::{fill_blank, try_fill_blank, GapFiller};
pub use gapfill_calendar::{canonical_key, generate_points, Granularity};
pub use record::{Record, TimePoint, TimedRecord};
