//! Test: Full Analysis - every section fetched and reported

use crate::support::*;
use performance_calculator::analysis::{AnalysisEvent, RepositoryAnalyzer, Section};
use std::sync::{Arc, Mutex};

fn mock() -> MockGitHub {
    MockGitHub::new()
        .with_runs(
            vec![
                run(2, "bob", "failure", 1, "2024-01-10 08:00:00"),
                run(1, "alice", "success", 1, "2024-01-09 08:00:00"),
            ],
            250,
        )
        .with_contributors(&[("carol", 3), ("alice", 40), ("bob", 12)])
}

#[tokio::test]
async fn test_full_report() {
    let analyzer = RepositoryAnalyzer::new(mock());
    let report = analyzer.analyze().await.unwrap();

    assert_eq!(report.summary.full_name, "owner/repo");
    assert_eq!(report.builds.total_count, 250);
    assert_eq!(report.builds.items.len(), 2);
    assert_eq!(report.contributors.total_count, 3);
    assert!(report.pull_requests.is_empty());

    let top: Vec<_> = report.top_contributors(2).iter().map(|c| c.login.as_str()).collect();
    assert_eq!(top, vec!["alice", "bob"]);
}

#[tokio::test]
async fn test_sections_capped_by_limit() {
    let mut github = mock();
    github.runs = (0..5)
        .map(|i| run(i, "alice", "success", 1, "2024-01-09 08:00:00"))
        .collect();
    github.runs_total = 5;

    let analyzer = RepositoryAnalyzer::new(github).with_section_limit(3);
    let report = analyzer.analyze().await.unwrap();

    assert_eq!(report.builds.items.len(), 3);
    assert_eq!(report.builds.total_count, 5);
}

#[tokio::test]
async fn test_events_in_order() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();

    let mut analyzer = RepositoryAnalyzer::new(mock());
    analyzer.add_event_handler(move |event| sink.lock().unwrap().push(event));
    analyzer.analyze().await.unwrap();

    let events = events.lock().unwrap();
    assert!(matches!(&events[0], AnalysisEvent::RepositoryLoaded { repository } if repository == "owner/repo"));

    let fetched: Vec<Section> = events
        .iter()
        .filter_map(|e| match e {
            AnalysisEvent::SectionFetched { section, .. } => Some(*section),
            _ => None,
        })
        .collect();
    assert_eq!(
        fetched,
        vec![
            Section::Builds,
            Section::PullRequests,
            Section::Commits,
            Section::Contributors
        ]
    );
    assert_eq!(events.len(), 1 + 4 * 2);
}

#[tokio::test]
async fn test_report_json_shape() {
    let report = RepositoryAnalyzer::new(mock()).analyze().await.unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["repository"], "owner/repo");
    assert_eq!(value["url"], "https://github.com/owner/repo");
    assert_eq!(value["stars"], 42);
    assert_eq!(value["created_at"], "2023-01-01");
    assert_eq!(value["builds"]["total_count"], 250);
    assert_eq!(value["builds"]["runs"][0]["created_at"], "2024-01-10 08:00:00");
    assert_eq!(value["contributors"]["contributors"][0]["login"], "carol");
}
