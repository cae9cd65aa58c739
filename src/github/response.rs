//! GitHub REST response types

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::core::{CommitInfo, ContributorInfo, PullRequestInfo, RepositorySummary, WorkflowRun};

/// Error types for GitHub API operations
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed (401): {0}")]
    Unauthorized(String),

    #[error("Rate limit exceeded{}", .reset.map(|r| format!(", resets at {}", r)).unwrap_or_default())]
    RateLimited { reset: Option<DateTime<Utc>> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("GitHub returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode response from {path}: {message}")]
    Decode { path: String, message: String },
}

/// Body of a GitHub error response
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiUser {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiRepository {
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApiRepository> for RepositorySummary {
    fn from(repo: ApiRepository) -> Self {
        Self {
            full_name: repo.full_name,
            html_url: repo.html_url,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            created_at: repo.created_at.date_naive(),
            last_updated: repo.updated_at.date_naive(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiWorkflowRuns {
    pub total_count: u64,
    pub workflow_runs: Vec<ApiWorkflowRun>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiRunPullRequest {
    pub base: Option<ApiRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiRef {
    #[serde(rename = "ref")]
    pub ref_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiWorkflowRun {
    pub id: u64,
    pub name: Option<String>,
    #[serde(default)]
    pub display_title: Option<String>,
    pub status: Option<String>,
    pub conclusion: Option<String>,
    pub head_branch: Option<String>,
    #[serde(default)]
    pub pull_requests: Vec<ApiRunPullRequest>,
    #[serde(default = "default_attempt")]
    pub run_attempt: u32,
    #[serde(default)]
    pub run_number: u64,
    pub created_at: DateTime<Utc>,
    pub actor: Option<ApiUser>,
}

fn default_attempt() -> u32 {
    1
}

impl From<ApiWorkflowRun> for WorkflowRun {
    fn from(run: ApiWorkflowRun) -> Self {
        let base_branch = run
            .pull_requests
            .first()
            .and_then(|pr| pr.base.as_ref())
            .and_then(|base| base.ref_name.clone());

        Self {
            id: run.id,
            author: run.actor.map(|actor| actor.login),
            workflow_name: run.name.unwrap_or_default(),
            pr_name: run.display_title.unwrap_or_default(),
            status: run.status.unwrap_or_default(),
            conclusion: run.conclusion,
            head_branch: run.head_branch,
            base_branch,
            pull_requests_count: run.pull_requests.len(),
            run_attempt: run.run_attempt,
            run_number: run.run_number,
            created_at: run.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub user: Option<ApiUser>,
    pub html_url: String,
}

impl From<ApiPullRequest> for PullRequestInfo {
    fn from(pr: ApiPullRequest) -> Self {
        Self {
            number: pr.number,
            title: pr.title,
            state: pr.state,
            created_at: pr.created_at,
            user: pr.user.map(|u| u.login).unwrap_or_default(),
            url: pr.html_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCommit {
    pub sha: String,
    pub html_url: String,
    pub author: Option<ApiUser>,
    pub commit: ApiCommitDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCommitDetail {
    pub message: String,
    pub author: Option<ApiGitAuthor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiGitAuthor {
    pub date: DateTime<Utc>,
}

impl TryFrom<ApiCommit> for CommitInfo {
    type Error = String;

    fn try_from(commit: ApiCommit) -> Result<Self, Self::Error> {
        let date = commit
            .commit
            .author
            .map(|a| a.date)
            .ok_or_else(|| format!("commit {} has no author date", commit.sha))?;

        Ok(Self {
            author: commit
                .author
                .map(|a| a.login)
                .unwrap_or_else(|| CommitInfo::UNKNOWN_AUTHOR.to_string()),
            message: commit.commit.message.lines().next().unwrap_or_default().to_string(),
            date,
            url: commit.html_url,
            sha: commit.sha,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiContributor {
    /// Anonymous contributors have no login
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub contributions: u64,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl From<ApiContributor> for ContributorInfo {
    fn from(c: ApiContributor) -> Self {
        Self {
            login: c.login.or(c.name).unwrap_or_default(),
            contributions: c.contributions,
            url: c.html_url.unwrap_or_default(),
        }
    }
}
