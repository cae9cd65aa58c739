//! Test: Partial Failure - a failing section degrades to an empty listing

use crate::support::*;
use performance_calculator::analysis::{AnalysisError, AnalysisEvent, RepositoryAnalyzer, Section};
use performance_calculator::github::GitHubError;
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn test_failed_sections_are_empty() {
    let github = MockGitHub::new()
        .with_runs(vec![run(1, "alice", "success", 1, "2024-01-09 08:00:00")], 1)
        .with_contributors(&[("alice", 1)])
        .failing("commits")
        .failing("pulls");

    let report = RepositoryAnalyzer::new(github).analyze().await.unwrap();

    assert_eq!(report.builds.items.len(), 1);
    assert_eq!(report.commits.total_count, 0);
    assert!(report.commits.is_empty());
    assert_eq!(report.pull_requests.total_count, 0);
    assert_eq!(report.contributors.total_count, 1);
}

#[tokio::test]
async fn test_failed_section_reported_as_event() {
    let failures = Arc::new(Mutex::new(Vec::new()));
    let sink = failures.clone();

    let mut analyzer = RepositoryAnalyzer::new(MockGitHub::new().failing("contributors"));
    analyzer.add_event_handler(move |event| {
        if let AnalysisEvent::SectionFailed { section, error } = event {
            sink.lock().unwrap().push((section, error));
        }
    });
    analyzer.analyze().await.unwrap();

    let failures = failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, Section::Contributors);
    assert!(failures[0].1.contains("API error"));
}

#[tokio::test]
async fn test_missing_repository_aborts() {
    let analyzer = RepositoryAnalyzer::new(MockGitHub::new().failing("repository"));

    let err = analyzer.analyze().await.unwrap_err();
    assert!(matches!(err, AnalysisError::Repository(GitHubError::NotFound(_))));
    assert!(err.to_string().starts_with("Error analyzing repository"));
}
