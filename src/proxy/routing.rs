//! Date-range routing table and request-date parsing.
//!
//! [`DateRangeTable`] is built once from validated configuration and
//! never mutated afterwards; every request task reads it through a
//! shared reference with no locking. [`DateRangeTable::match_date`]
//! scans entries in configured order and returns the first range whose
//! inclusive interval contains the date, so overlapping ranges resolve
//! deterministically to the earliest-listed one.

use chrono::NaiveDate;
use url::Url;

use crate::config::model::{Config, DATE_FORMAT};
use crate::config::validation::validate_date;
use crate::error::{TimegateError, ValidationError};

/// Parse a `date` query parameter value.
///
/// Accepts exactly eight characters forming a real calendar date in
/// `YYYYMMDD` form; anything else is `None`. The length check comes
/// first so `%Y` cannot swallow a variable number of digits.
#[must_use]
pub fn parse_request_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 8 {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

#[derive(Debug, Clone)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub target: Url,
}

impl DateRange {
    fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Default)]
pub struct DateRangeTable {
    entries: Vec<DateRange>,
}

impl DateRangeTable {
    /// Build the runtime table from an already-validated [`Config`].
    ///
    /// Re-parsing can still fail if the caller skipped
    /// [`validate`](crate::config::validation::validate), so failures
    /// surface as the same validation error type instead of panicking.
    pub fn from_config(config: &Config) -> Result<Self, TimegateError> {
        let mut entries = Vec::with_capacity(config.date_ranges.len());

        for (i, range) in config.date_ranges.iter().enumerate() {
            let entry = Self::parse_entry(&range.start, &range.end, &range.target).map_err(
                |(field, message)| TimegateError::ConfigValidation {
                    errors: vec![ValidationError {
                        range: format!("date_ranges[{i}]"),
                        field: field.into(),
                        message,
                        suggestion: None,
                    }],
                },
            )?;
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    fn parse_entry(
        start: &str,
        end: &str,
        target: &str,
    ) -> Result<DateRange, (&'static str, String)> {
        let start = validate_date(start).map_err(|msg| ("start", msg))?;
        let end = validate_date(end).map_err(|msg| ("end", msg))?;
        if start > end {
            return Err(("start", format!("start date {start} is after end date {end}")));
        }
        let target = Url::parse(target)
            .map_err(|e| ("target", format!("'{target}' is not a valid URL: {e}")))?;
        Ok(DateRange { start, end, target })
    }

    /// First configured range containing `date`, or `None`.
    #[must_use]
    pub fn match_date(&self, date: NaiveDate) -> Option<&Url> {
        self.entries
            .iter()
            .find(|entry| entry.contains(date))
            .map(|entry| &entry.target)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::DateRangeConfig;

    fn table(ranges: &[(&str, &str, &str)]) -> DateRangeTable {
        let config = Config {
            port: 8080,
            read_timeout_ms: 15_000,
            write_timeout_ms: 60_000,
            idle_timeout_ms: 60_000,
            forward_timeout_ms: 30_000,
            date_ranges: ranges
                .iter()
                .map(|(start, end, target)| DateRangeConfig {
                    start: (*start).to_string(),
                    end: (*end).to_string(),
                    target: (*target).to_string(),
                })
                .collect(),
        };
        DateRangeTable::from_config(&config).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        parse_request_date(s).unwrap()
    }

    #[test]
    fn matches_inside_range() {
        let table = table(&[("20230101", "20230630", "http://svc-a")]);
        let target = table.match_date(date("20230315")).unwrap();
        assert_eq!(target.as_str(), "http://svc-a/");
    }

    #[test]
    fn boundary_dates_are_inclusive() {
        let table = table(&[("20230101", "20230630", "http://svc-a")]);
        assert!(table.match_date(date("20230101")).is_some());
        assert!(table.match_date(date("20230630")).is_some());
        assert!(table.match_date(date("20221231")).is_none());
        assert!(table.match_date(date("20230701")).is_none());
    }

    #[test]
    fn no_match_returns_none() {
        let table = table(&[("20230101", "20230630", "http://svc-a")]);
        assert!(table.match_date(date("20240101")).is_none());
    }

    #[test]
    fn first_listed_range_wins_on_overlap() {
        let table = table(&[
            ("20230101", "20230630", "http://svc-a"),
            ("20230601", "20231231", "http://svc-b"),
        ]);

        // 20230615 falls in both; the earlier entry wins.
        let target = table.match_date(date("20230615")).unwrap();
        assert_eq!(target.host_str(), Some("svc-a"));

        // Outside the overlap the later entry still matches.
        let target = table.match_date(date("20230901")).unwrap();
        assert_eq!(target.host_str(), Some("svc-b"));
    }

    #[test]
    fn overlap_policy_ignores_how_many_ranges_match() {
        let table = table(&[
            ("20230101", "20231231", "http://svc-a"),
            ("20230101", "20231231", "http://svc-b"),
            ("20230101", "20231231", "http://svc-c"),
        ]);
        let target = table.match_date(date("20230615")).unwrap();
        assert_eq!(target.host_str(), Some("svc-a"));
    }

    #[test]
    fn single_day_range() {
        let table = table(&[("20230704", "20230704", "http://svc-a")]);
        assert!(table.match_date(date("20230704")).is_some());
        assert!(table.match_date(date("20230703")).is_none());
        assert!(table.match_date(date("20230705")).is_none());
    }

    #[test]
    fn reversed_range_is_rejected_at_build() {
        let config = Config {
            port: 8080,
            read_timeout_ms: 15_000,
            write_timeout_ms: 60_000,
            idle_timeout_ms: 60_000,
            forward_timeout_ms: 30_000,
            date_ranges: vec![DateRangeConfig {
                start: "20231231".into(),
                end: "20230101".into(),
                target: "http://svc-a".into(),
            }],
        };
        assert!(DateRangeTable::from_config(&config).is_err());
    }

    #[test]
    fn parse_accepts_valid_dates() {
        assert!(parse_request_date("20230101").is_some());
        assert!(parse_request_date("20240229").is_some()); // leap day
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(parse_request_date("2023010").is_none());
        assert!(parse_request_date("202301011").is_none());
        assert!(parse_request_date("").is_none());
    }

    #[test]
    fn parse_rejects_non_calendar_values() {
        assert!(parse_request_date("20231332").is_none());
        assert!(parse_request_date("20230229").is_none()); // not a leap year
        assert!(parse_request_date("2023abcd").is_none());
    }
}
