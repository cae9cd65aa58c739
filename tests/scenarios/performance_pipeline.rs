//! Test: Performance Pipeline - fetched runs stored, reloaded and rated

use crate::support::*;
use chrono::{NaiveDate, NaiveDateTime};
use performance_calculator::analysis::{calculate, BuildRatio, RepositoryAnalyzer};
use performance_calculator::core::BuildRecord;
use performance_calculator::results::{CsvResultsStore, InMemoryResults, ResultKind, ResultsStore};

fn clock() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap()
}

fn mock() -> MockGitHub {
    MockGitHub::new().with_runs(
        vec![
            // Week of 2024-01-08
            run(6, "alice", "success", 1, "2024-01-14 23:00:00"),
            run(5, "alice", "success", 1, "2024-01-10 09:00:00"),
            run(4, "alice", "failure", 1, "2024-01-09 09:00:00"),
            run(3, "bob", "success", 3, "2024-01-08 00:30:00"),
            // Week of 2024-01-01
            run(2, "bob", "cancelled", 1, "2024-01-03 12:00:00"),
            run(1, "alice", "success", 1, "2024-01-02 12:00:00"),
        ],
        6,
    )
}

async fn fetched_records() -> Vec<BuildRecord> {
    let report = RepositoryAnalyzer::new(mock()).fetch_builds(None, None).await.unwrap();
    report.builds.iter().map(BuildRecord::from).collect()
}

#[tokio::test]
async fn test_weekly_ratios_per_author() {
    let store = InMemoryResults::with_clock(clock);
    store.save_builds(&fetched_records().await).unwrap();

    let (_, records) = store.latest_builds().unwrap();
    let rows = calculate(&records);
    store.save_performance(&rows).unwrap();

    let summary: Vec<(String, String, String)> = rows
        .iter()
        .map(|r| (r.author.clone(), r.date_range.clone(), r.build_ratio.to_string()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("alice".into(), "2024-01-01...2024-01-07".into(), "inf".into()),
            ("alice".into(), "2024-01-08...2024-01-14".into(), "2.0".into()),
            ("bob".into(), "2024-01-01...2024-01-07".into(), "0".into()),
            ("bob".into(), "2024-01-08...2024-01-14".into(), "0.5".into()),
        ]
    );
    assert_eq!(rows[3].build_ratio, BuildRatio::Ratio(0.5));
    assert_eq!(store.performance_reports().len(), 1);
    assert_eq!(store.list(ResultKind::Performance).unwrap().len(), 1);
}

#[tokio::test]
async fn test_csv_round_trip_keeps_ratios() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvResultsStore::with_clock(dir.path(), clock);
    let records = fetched_records().await;

    store.save_builds(&records).unwrap();
    let (location, loaded) = store.latest_builds().unwrap();
    assert_eq!(location.name, "github_workflow_data_20240115_180000.csv");
    assert_eq!(calculate(&loaded), calculate(&records));

    let saved = store.save_performance(&calculate(&loaded)).unwrap();
    let content = std::fs::read_to_string(saved.path.unwrap()).unwrap();
    assert!(content.starts_with("author,date_range,build_ratio\n"));
    assert!(content.contains("bob,2024-01-08...2024-01-14,0.5\n"));
}
