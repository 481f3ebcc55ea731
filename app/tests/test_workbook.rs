//! FILENAME: tests/test_workbook.rs
//! Integration tests for workbook loading and the one-shot commands.

mod common;

use app_lib::{load_snapshot, run_show, AppError, OutputFormat, RenderOptions};
use common::{ScenarioFixture, TestHarness};
use persistence::PersistenceError;
use records::{sample_records, FlatRecord, Organization};

#[test]
fn test_sample_workbook_loads_back() {
    let harness = TestHarness::with_sample_workbook();
    let records = load_snapshot(&harness.config).unwrap();
    assert_eq!(records, sample_records());
}

#[test]
fn test_show_from_workbook_matches_bundled_sample() {
    let from_workbook = TestHarness::with_sample_workbook();
    let bundled = TestHarness::new();
    let options = RenderOptions {
        plain: true,
        ..RenderOptions::default()
    };

    let a = run_show(&from_workbook.config, OutputFormat::Json, true, options).unwrap();
    let b = run_show(&bundled.config, OutputFormat::Json, true, options).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_show_table_lists_scenario() {
    let harness = TestHarness::with_records(&ScenarioFixture::records());
    let options = RenderOptions {
        plain: true,
        ..RenderOptions::default()
    };
    let text = run_show(&harness.config, OutputFormat::Table, true, options).unwrap();

    assert!(text.contains("PlantA"));
    assert!(text.contains("T1"));
    assert!(text.contains("TOTAL"));
    assert!(text.contains("6 row(s)"));
}

#[test]
fn test_blank_division_rows_are_skipped_not_fatal() {
    let mut records = ScenarioFixture::records();
    records.push(
        FlatRecord::new(Organization::Vj, "")
            .with_team("Ghost")
            .with_measures(100.0, 0.0, 0.0),
    );
    let mut harness = TestHarness::with_records(&records);
    assert_eq!(load_snapshot(&harness.config).unwrap().len(), 3);

    let mut session = harness.session();
    let view = session.render();
    assert_eq!(view.total.totals.a, 6.0);
    assert_eq!(view.skipped_records, 0);

    // A blank division is not the production division, so only the
    // non-production build sees the record.
    harness.config.department_view = drilldown_engine::DepartmentView::NonProduction;
    let mut session = harness.session();
    let view = session.render();
    assert!(view.rows.is_empty());
    assert_eq!(view.total.totals.a, 0.0);
    assert_eq!(view.skipped_records, 1);
}

#[test]
fn test_missing_workbook_is_an_error() {
    let mut harness = TestHarness::new();
    harness.config.workbook = Some(harness.path("missing.xlsx"));
    match load_snapshot(&harness.config) {
        Err(AppError::Persistence(PersistenceError::XlsxRead(_)))
        | Err(AppError::Persistence(PersistenceError::Io(_))) => {}
        other => panic!("expected a read error, got {:?}", other.map(|r| r.len())),
    }
}

#[test]
fn test_missing_sheet_is_reported() {
    let mut harness = TestHarness::with_sample_workbook();
    harness.config.sheet = Some("other".to_string());
    assert!(matches!(
        load_snapshot(&harness.config),
        Err(AppError::Persistence(PersistenceError::SheetNotFound(_)))
    ));
}
