//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for structural
//! errors: zero port or durations, an empty routing table, malformed
//! `YYYYMMDD` dates, reversed ranges, and bad target URLs. Returns a
//! list of [`ValidationError`] values with per-field suggestions.
//!
//! Reversed ranges (`start > end`) are rejected here rather than left
//! to silently never match at request time.

use chrono::NaiveDate;
use url::Url;

use super::model::{Config, DATE_FORMAT};
use crate::error::ValidationError;

/// Validate a single `YYYYMMDD` date string. Returns the parsed date or
/// a human-readable error.
pub fn validate_date(value: &str) -> Result<NaiveDate, String> {
    if value.len() != 8 {
        return Err(format!(
            "'{value}' is not an 8-character YYYYMMDD date"
        ));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| format!("'{value}' is not a valid calendar date"))
}

/// Validate a single target URL. Returns `Ok(())` or a human-readable error.
pub fn validate_target_url(url: &str) -> Result<(), String> {
    match Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else if parsed.host_str().is_none() {
                Err(format!("'{url}' has no host"))
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{url}' is not a valid absolute URL")),
    }
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.port == 0 {
        errors.push(ValidationError {
            range: "(root)".into(),
            field: "port".into(),
            message: "port cannot be 0".into(),
            suggestion: Some("pick a port between 1 and 65535".into()),
        });
    }

    for (field, value) in [
        ("read_timeout_ms", config.read_timeout_ms),
        ("write_timeout_ms", config.write_timeout_ms),
        ("idle_timeout_ms", config.idle_timeout_ms),
        ("forward_timeout_ms", config.forward_timeout_ms),
    ] {
        if value == 0 {
            errors.push(ValidationError {
                range: "(root)".into(),
                field: field.into(),
                message: "duration must be positive".into(),
                suggestion: None,
            });
        }
    }

    if config.date_ranges.is_empty() {
        errors.push(ValidationError {
            range: "(root)".into(),
            field: "date_ranges".into(),
            message: "at least one date range must be defined".into(),
            suggestion: None,
        });
        return Err(errors);
    }

    for (i, range) in config.date_ranges.iter().enumerate() {
        let range_id = format!("date_ranges[{i}]");

        let start = match validate_date(&range.start) {
            Ok(date) => Some(date),
            Err(msg) => {
                errors.push(ValidationError {
                    range: range_id.clone(),
                    field: "start".into(),
                    message: msg,
                    suggestion: Some("use YYYYMMDD, e.g. 20230101".into()),
                });
                None
            }
        };

        let end = match validate_date(&range.end) {
            Ok(date) => Some(date),
            Err(msg) => {
                errors.push(ValidationError {
                    range: range_id.clone(),
                    field: "end".into(),
                    message: msg,
                    suggestion: Some("use YYYYMMDD, e.g. 20231231".into()),
                });
                None
            }
        };

        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                errors.push(ValidationError {
                    range: range_id.clone(),
                    field: "start".into(),
                    message: format!(
                        "start date {} is after end date {}",
                        range.start, range.end
                    ),
                    suggestion: Some("swap the bounds; ranges are inclusive".into()),
                });
            }
        }

        if let Err(msg) = validate_target_url(&range.target) {
            errors.push(ValidationError {
                range: range_id,
                field: "target".into(),
                message: msg,
                suggestion: None,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let mut lines = vec![format!("  {} date ranges\n", config.range_count())];

    for range in &config.date_ranges {
        lines.push(format!(
            "  [{} .. {}]  -> {}",
            range.start, range.end, range.target
        ));
    }

    lines.push(String::new());
    lines.push(format!("  port: {}", config.port));
    lines.push(format!("  forward timeout: {}ms", config.forward_timeout_ms));

    format!("{} is valid\n{}", path, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::DateRangeConfig;

    fn range(start: &str, end: &str, target: &str) -> DateRangeConfig {
        DateRangeConfig {
            start: start.into(),
            end: end.into(),
            target: target.into(),
        }
    }

    fn minimal_config() -> Config {
        Config {
            port: 8080,
            read_timeout_ms: 15_000,
            write_timeout_ms: 60_000,
            idle_timeout_ms: 60_000,
            forward_timeout_ms: 30_000,
            date_ranges: vec![range("20230101", "20231231", "http://localhost:9001")],
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate(&minimal_config()).is_ok());
    }

    #[test]
    fn empty_ranges_fails() {
        let mut config = minimal_config();
        config.date_ranges.clear();
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("at least one date range"));
    }

    #[test]
    fn zero_port_fails() {
        let mut config = minimal_config();
        config.port = 0;
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "port"));
    }

    #[test]
    fn zero_duration_fails() {
        let mut config = minimal_config();
        config.forward_timeout_ms = 0;
        let errors = validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.field == "forward_timeout_ms" && e.message.contains("positive")));
    }

    #[test]
    fn short_date_fails() {
        let mut config = minimal_config();
        config.date_ranges = vec![range("2023011", "20231231", "http://localhost:9001")];
        let errors = validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.message.contains("8-character")));
    }

    #[test]
    fn non_calendar_date_fails() {
        let mut config = minimal_config();
        config.date_ranges = vec![range("20231332", "20231231", "http://localhost:9001")];
        let errors = validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.message.contains("not a valid calendar date")));
    }

    #[test]
    fn reversed_range_fails() {
        let mut config = minimal_config();
        config.date_ranges = vec![range("20231231", "20230101", "http://localhost:9001")];
        let errors = validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.message.contains("is after end date")));
    }

    #[test]
    fn relative_url_fails() {
        let mut config = minimal_config();
        config.date_ranges = vec![range("20230101", "20231231", "/not/absolute")];
        let errors = validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.message.contains("not a valid absolute URL")));
    }

    #[test]
    fn non_http_scheme_fails() {
        let mut config = minimal_config();
        config.date_ranges = vec![range("20230101", "20231231", "ftp://host:21")];
        let errors = validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.message.contains("unsupported scheme")));
    }

    #[test]
    fn all_range_errors_reported() {
        let mut config = minimal_config();
        config.date_ranges = vec![
            range("bad", "20231231", "http://a:80"),
            range("20230101", "20231231", "not a url"),
        ];
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.range == "date_ranges[0]"));
        assert!(errors.iter().any(|e| e.range == "date_ranges[1]"));
    }
}
