//! TOML fill configuration.
//!
//! ```toml
//! granularity = "day"
//! start = "2021-12-14"
//! end = "2022-02-01"
//! ```
//!
//! Bounds accept any layout [`gapfill_calendar::dates::parse_auto`] detects.
//! Every key is optional; a missing one surfaces as
//! [`crate::FillError::InvalidArgument`] when the filler runs.

use crate::factory::RecordFactory;
use crate::filler::GapFiller;
use chrono::NaiveDateTime;
use gapfill_calendar::{dates, DateError, Granularity};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading or resolving a fill configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config {field}: {source}")]
    Date {
        field: &'static str,
        #[source]
        source: DateError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FillConfig {
    pub granularity: Option<Granularity>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// A config with its bounds parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub granularity: Option<Granularity>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl FillConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse the bounds. Blank bounds resolve to `None`.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        Ok(ResolvedConfig {
            granularity: self.granularity,
            start: resolve_bound("start", self.start.as_deref())?,
            end: resolve_bound("end", self.end.as_deref())?,
        })
    }
}

fn resolve_bound(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDateTime>, ConfigError> {
    match value {
        Some(text) => dates::parse_auto(text).map_err(|source| ConfigError::Date { field, source }),
        None => Ok(None),
    }
}

impl<R> GapFiller<R> {
    /// Build a filler from a config. Absent entries stay absent.
    pub fn from_config(
        config: &FillConfig,
        factory: RecordFactory<R>,
    ) -> Result<Self, ConfigError> {
        let resolved = config.resolve()?;
        Ok(GapFiller::with_parts(
            factory,
            resolved.granularity,
            resolved.start,
            resolved.end,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FillError;
    use crate::record::{Record, TimePoint};
    use chrono::NaiveDate;
    use std::io::Write;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn parses_full_config() {
        let config = FillConfig::from_toml(
            r#"
            granularity = "day"
            start = "2021-12-14"
            end = "2022-02-01"
            "#,
        )
        .unwrap();
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.granularity, Some(Granularity::Day));
        assert_eq!(resolved.start, Some(day(2021, 12, 14)));
        assert_eq!(resolved.end, Some(day(2022, 2, 1)));
    }

    #[test]
    fn missing_keys_resolve_to_none() {
        let resolved = FillConfig::from_toml("granularity = \"month\"")
            .unwrap()
            .resolve()
            .unwrap();
        assert_eq!(resolved.start, None);
        assert_eq!(resolved.end, None);
    }

    #[test]
    fn unknown_granularity_is_a_parse_error() {
        let err = FillConfig::from_toml("granularity = \"week\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_key_is_a_parse_error() {
        let err = FillConfig::from_toml("step = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn bad_bound_names_the_field() {
        let config = FillConfig {
            granularity: Some(Granularity::Day),
            start: Some("2021-12-14".into()),
            end: Some("01/02/2022".into()),
        };
        let err = config.resolve().unwrap_err();
        assert!(matches!(err, ConfigError::Date { field: "end", .. }));
        assert!(err.to_string().starts_with("config end:"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "granularity = \"hour\"").unwrap();
        writeln!(file, "start = \"2021-12-14 08:00\"").unwrap();
        writeln!(file, "end = \"2021-12-14 11:00\"").unwrap();

        let config = FillConfig::from_file(file.path()).unwrap();
        assert_eq!(config.granularity, Some(Granularity::Hour));

        let factory = RecordFactory::<TimePoint>::from_default();
        let filler = GapFiller::from_config(&config, factory).unwrap();
        let mut records = vec![TimePoint::new(2021, 12, 14, 9, 0)];
        let filled = filler.fill(&mut records, |_| {}).unwrap();
        let hours: Vec<u32> = filled.iter().map(|p| p.hour()).collect();
        assert_eq!(hours, vec![8, 9, 10, 11]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = FillConfig::from_file(Path::new("/nonexistent/gapfill.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn config_without_bounds_fails_at_fill_time() {
        let config = FillConfig::from_toml("granularity = \"day\"").unwrap();
        let factory = RecordFactory::<TimePoint>::from_default();
        let filler = GapFiller::from_config(&config, factory).unwrap();
        let mut records = vec![TimePoint::ymd(2021, 12, 2)];
        let err = filler.fill(&mut records, |_| {}).unwrap_err();
        assert_eq!(
            err,
            FillError::InvalidArgument {
                message: "start or end is missing".into()
            }
        );
    }
}
