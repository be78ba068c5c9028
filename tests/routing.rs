//! Integration tests for date-range table matching.

use chrono::NaiveDate;
use timegate::config::model::{Config, DateRangeConfig};
use timegate::proxy::routing::{parse_request_date, DateRangeTable};

fn make_config(ranges: &[(&str, &str, &str)]) -> Config {
    Config {
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
    }
}

fn make_table(ranges: &[(&str, &str, &str)]) -> DateRangeTable {
    DateRangeTable::from_config(&make_config(ranges)).unwrap()
}

fn date(s: &str) -> NaiveDate {
    parse_request_date(s).unwrap()
}

#[test]
fn every_day_of_a_range_matches_its_target() {
    let table = make_table(&[
        ("20230101", "20230630", "http://svc-a"),
        ("20230701", "20231231", "http://svc-b"),
    ]);

    let mut day = date("20230101");
    while day <= date("20231231") {
        let target = table.match_date(day).expect("every day of 2023 is covered");
        let expected = if day <= date("20230630") { "svc-a" } else { "svc-b" };
        assert_eq!(target.host_str(), Some(expected), "day {day}");
        day = day.succ_opt().unwrap();
    }
}

#[test]
fn dates_outside_all_ranges_return_none() {
    let table = make_table(&[("20230101", "20230630", "http://svc-a")]);

    assert!(table.match_date(date("20221231")).is_none());
    assert!(table.match_date(date("20230701")).is_none());
    assert!(table.match_date(date("19991231")).is_none());
}

#[test]
fn overlap_resolves_to_earliest_listed_range() {
    // Ranges overlap over June 2023; the first listed one wins there.
    let table = make_table(&[
        ("20230101", "20230630", "http://svc-a"),
        ("20230601", "20231231", "http://svc-b"),
    ]);

    assert_eq!(
        table.match_date(date("20230615")).unwrap().host_str(),
        Some("svc-a")
    );
    // Overlap boundaries behave the same way.
    assert_eq!(
        table.match_date(date("20230601")).unwrap().host_str(),
        Some("svc-a")
    );
    assert_eq!(
        table.match_date(date("20230630")).unwrap().host_str(),
        Some("svc-a")
    );
    // Past the first range's end, the second takes over.
    assert_eq!(
        table.match_date(date("20230701")).unwrap().host_str(),
        Some("svc-b")
    );
}

#[test]
fn overlap_winner_is_independent_of_match_count() {
    let table = make_table(&[
        ("20230610", "20230620", "http://svc-a"),
        ("20230101", "20231231", "http://svc-b"),
        ("20230601", "20230630", "http://svc-c"),
    ]);

    // Three ranges contain 20230615; listing order decides.
    assert_eq!(
        table.match_date(date("20230615")).unwrap().host_str(),
        Some("svc-a")
    );
    // Only the second and third contain 20230605.
    assert_eq!(
        table.match_date(date("20230605")).unwrap().host_str(),
        Some("svc-b")
    );
}

#[test]
fn table_reports_entry_count() {
    let table = make_table(&[
        ("20230101", "20230630", "http://svc-a"),
        ("20230701", "20231231", "http://svc-b"),
    ]);
    assert_eq!(table.len(), 2);
    assert!(!table.is_empty());
}

#[test]
fn build_fails_on_unvalidated_garbage() {
    let config = make_config(&[("not-a-date", "20231231", "http://svc-a")]);
    assert!(DateRangeTable::from_config(&config).is_err());

    let config = make_config(&[("20230101", "20231231", "::::")]);
    assert!(DateRangeTable::from_config(&config).is_err());
}
