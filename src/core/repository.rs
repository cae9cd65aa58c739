//! Repository-level report models

use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::core::build::{timestamp, WorkflowRun};

/// Basic repository information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    #[serde(rename = "repository")]
    pub full_name: String,
    #[serde(rename = "url")]
    pub html_url: String,
    pub stars: u64,
    pub forks: u64,
    pub created_at: NaiveDate,
    pub last_updated: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestInfo {
    pub number: u64,
    pub title: String,
    pub state: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub user: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
    /// Login of the GitHub user, `Unknown` when the commit is not linked to one
    pub author: String,
    /// First line of the commit message
    pub message: String,
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
    pub url: String,
}

impl CommitInfo {
    pub const UNKNOWN_AUTHOR: &'static str = "Unknown";

    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributorInfo {
    pub login: String,
    pub contributions: u64,
    pub url: String,
}

/// A fetched page of items with the server-side total
///
/// `total_count` may exceed `items.len()` when the fetch was capped.
/// Items serialize under the key of their kind: `runs`, `pull_requests`,
/// `commits` or `contributors`.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub total_count: u64,
    pub items: Vec<T>,
}

impl<T> Listing<T> {
    pub fn new(total_count: u64, items: Vec<T>) -> Self {
        Self { total_count, items }
    }

    pub fn empty() -> Self {
        Self {
            total_count: 0,
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Items that can appear in a `Listing`
pub trait ListingItem {
    /// JSON key holding the items
    const KEY: &'static str;
}

impl ListingItem for WorkflowRun {
    const KEY: &'static str = "runs";
}

impl ListingItem for PullRequestInfo {
    const KEY: &'static str = "pull_requests";
}

impl ListingItem for CommitInfo {
    const KEY: &'static str = "commits";
}

impl ListingItem for ContributorInfo {
    const KEY: &'static str = "contributors";
}

impl<T: ListingItem + Serialize> Serialize for Listing<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Listing", 2)?;
        state.serialize_field("total_count", &self.total_count)?;
        state.serialize_field(T::KEY, &self.items)?;
        state.end()
    }
}

/// Full analysis of a repository
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryReport {
    #[serde(flatten)]
    pub summary: RepositorySummary,
    pub builds: Listing<WorkflowRun>,
    pub pull_requests: Listing<PullRequestInfo>,
    pub commits: Listing<CommitInfo>,
    pub contributors: Listing<ContributorInfo>,
}

impl RepositoryReport {
    /// Contributors sorted by contribution count, highest first
    pub fn top_contributors(&self, n: usize) -> Vec<&ContributorInfo> {
        let mut sorted: Vec<&ContributorInfo> = self.contributors.items.iter().collect();
        sorted.sort_by(|a, b| b.contributions.cmp(&a.contributions));
        sorted.into_iter().take(n).collect()
    }
}

/// Builds of a repository, as used by the raw-data export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildsReport {
    pub repository: String,
    pub url: String,
    pub total_count: u64,
    pub builds: Vec<WorkflowRun>,
}
