//! Gapfill Calendar — the calendar primitives the gap filler is built on.
//!
//! This crate provides:
//! - `Granularity` (hour/day/month/year) with its canonical format and calendar step
//! - Overshoot-inclusive point generation between two bounds
//! - Canonical keys for comparing points at a granularity
//! - Date helpers: formatting, pattern and auto-detected parsing, lenient
//!   field reconstruction, and day/week/month/year boundaries
//!
//! All values are `chrono::NaiveDateTime` read as local wall-clock time.

pub mod dates;
pub mod error;
pub mod granularity;
pub mod points;

pub use error::DateError;
pub use granularity::Granularity;
pub use points::{canonical_key, generate_points, Points};
