//! GitHub REST API access

pub mod client;
pub mod http;
pub mod response;

use async_trait::async_trait;
pub use client::{GitHubClient, GitHubClientConfig};
pub use response::GitHubError;

use crate::core::{
    CommitInfo, ContributorInfo, DateFilter, Listing, PullRequestInfo, RepositorySummary,
    WorkflowRun,
};

/// Read access to one repository - allows for mock implementations in tests
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Basic repository information
    async fn repository(&self) -> Result<RepositorySummary, GitHubError>;

    /// Workflow runs, newest first, optionally filtered by creation date
    async fn workflow_runs(
        &self,
        filter: Option<&DateFilter>,
        limit: Option<usize>,
    ) -> Result<Listing<WorkflowRun>, GitHubError>;

    /// Pull requests in any state
    async fn pull_requests(&self, limit: Option<usize>) -> Result<Listing<PullRequestInfo>, GitHubError>;

    /// Commits on the default branch
    async fn commits(&self, limit: Option<usize>) -> Result<Listing<CommitInfo>, GitHubError>;

    /// All contributors
    async fn contributors(&self) -> Result<Listing<ContributorInfo>, GitHubError>;
}
