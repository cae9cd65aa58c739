//! Test: Build Export - runs fetched with a date filter and limit

use crate::support::*;
use chrono::NaiveDate;
use performance_calculator::analysis::RepositoryAnalyzer;
use performance_calculator::core::{BuildRecord, DateFilter};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
}

#[tokio::test]
async fn test_filter_and_limit_forwarded() {
    let github = MockGitHub::new().with_runs(
        vec![
            run(3, "alice", "success", 1, "2024-01-30 10:00:00"),
            run(2, "bob", "failure", 3, "2024-01-29 10:00:00"),
            run(1, "alice", "success", 1, "2024-01-28 10:00:00"),
        ],
        3,
    );
    let analyzer = RepositoryAnalyzer::new(github);
    let filter = DateFilter::resolve(None, None, None, Some(7), today()).unwrap();

    let report = analyzer.fetch_builds(filter.as_ref(), Some(2)).await.unwrap();

    assert_eq!(report.repository, "owner/repo");
    assert_eq!(report.total_count, 3);
    assert_eq!(report.builds.len(), 2);
}

#[tokio::test]
async fn test_records_from_runs() {
    let github = MockGitHub::new().with_runs(vec![run(2, "bob", "failure", 3, "2024-01-29 10:00:00")], 1);
    let report = RepositoryAnalyzer::new(github).fetch_builds(None, None).await.unwrap();

    let records: Vec<BuildRecord> = report.builds.iter().map(BuildRecord::from).collect();
    assert_eq!(
        records[0].cells(),
        vec!["bob", "CI", "Change 2", "failure", "feature", "main", "3", "2024-01-29 10:00:00"]
    );
}

#[tokio::test]
async fn test_failed_runs_request_gives_empty_export() {
    let analyzer = RepositoryAnalyzer::new(MockGitHub::new().failing("runs"));
    let report = analyzer.fetch_builds(None, None).await.unwrap();

    assert_eq!(report.total_count, 0);
    assert!(report.builds.is_empty());
}
