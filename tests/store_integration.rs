//! Integration tests for the persisted report history.

use std::fs;

use bugdetect::analyze::{Analyzer, SourceUnit};
use bugdetect::domain::Sector;
use bugdetect::report::Report;
use bugdetect::store::ReportStore;
use tempfile::TempDir;

fn sample(source: &str) -> Report {
    let unit = SourceUnit::new("app.py", source);
    Analyzer::default()
        .analyze(&unit, Some(Sector::Education))
        .stamped()
}

#[test]
fn test_append_then_load_round_trip() {
    let temp = TempDir::new().unwrap();
    let store = ReportStore::new(temp.path().join("reports/bug_reports.json"));

    store.append(&sample("x = 1\n")).unwrap();
    let before = store.load_history().len();

    let report = sample("def f():\n    # TODO\n    pass\n");
    store.append(&report).unwrap();

    let reports = store.load_reports();
    assert_eq!(reports.len(), before + 1, "append should add exactly one record");
    assert_eq!(reports.last(), Some(&report), "last record should equal the appended report");
}

#[test]
fn test_corrupt_store_holds_only_new_report() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bug_reports.json");
    fs::write(&path, "[{\"file\": \"a.py\",").unwrap();

    let store = ReportStore::new(&path);
    let report = sample("x = 1\n");
    store.append(&report).unwrap();

    assert_eq!(store.load_reports(), vec![report]);
}

#[test]
fn test_syntax_error_reports_are_stored() {
    let temp = TempDir::new().unwrap();
    let store = ReportStore::new(temp.path().join("bug_reports.json"));

    let report = sample("def f(:\n");
    assert!(report.has_syntax_error());
    store.append(&report).unwrap();

    let stored = store.load_reports();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].has_syntax_error());
    assert!(stored[0].issues.is_empty());
}

#[test]
fn test_prior_records_are_untouched() {
    let temp = TempDir::new().unwrap();
    let store = ReportStore::new(temp.path().join("bug_reports.json"));

    let first = sample("x = 1\n");
    let second = sample("import os\nimport os\n");
    store.append(&first).unwrap();
    store.append(&second).unwrap();

    assert_eq!(store.load_reports(), vec![first, second]);
}
