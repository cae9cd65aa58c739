//! performance-calculator - build performance analytics for GitHub Actions

pub mod analysis;
pub mod cli;
pub mod core;
pub mod github;
pub mod results;

// Re-export commonly used types
pub use analysis::{AnalysisError, AnalysisEvent, AuthorWeekPerformance, BuildRatio, RepositoryAnalyzer};
pub use core::{BuildRecord, DateFilter, RepositoryReport, Settings, WorkflowRun};
pub use github::{GitHubApi, GitHubClient, GitHubClientConfig, GitHubError};
pub use results::{CsvResultsStore, InMemoryResults, ResultsStore};
