//! Shared fixtures: a mock GitHub API and JSON payload builders
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use performance_calculator::core::{
    CommitInfo, ContributorInfo, DateFilter, Listing, PullRequestInfo, RepositorySummary,
    WorkflowRun,
};
use performance_calculator::github::{GitHubApi, GitHubError};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Mutex;

/// Mock GitHub API with canned data
///
/// Sections named in `failing` return an error instead of data.
pub struct MockGitHub {
    pub summary: RepositorySummary,
    pub runs: Vec<WorkflowRun>,
    pub runs_total: u64,
    pub pull_requests: Vec<PullRequestInfo>,
    pub commits: Vec<CommitInfo>,
    pub contributors: Vec<ContributorInfo>,
    failing: HashSet<&'static str>,
    run_requests: Mutex<Vec<(Option<String>, Option<usize>)>>,
}

impl MockGitHub {
    pub fn new() -> Self {
        Self {
            summary: RepositorySummary {
                full_name: "owner/repo".to_string(),
                html_url: "https://github.com/owner/repo".to_string(),
                stars: 42,
                forks: 7,
                created_at: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                last_updated: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            },
            runs: Vec::new(),
            runs_total: 0,
            pull_requests: Vec::new(),
            commits: Vec::new(),
            contributors: Vec::new(),
            failing: HashSet::new(),
            run_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_runs(mut self, runs: Vec<WorkflowRun>, total: u64) -> Self {
        self.runs = runs;
        self.runs_total = total;
        self
    }

    pub fn with_contributors(mut self, contributors: &[(&str, u64)]) -> Self {
        self.contributors = contributors
            .iter()
            .map(|(login, contributions)| ContributorInfo {
                login: login.to_string(),
                contributions: *contributions,
                url: format!("https://github.com/{}", login),
            })
            .collect();
        self
    }

    /// Make a section fail: repository, runs, pulls, commits or contributors
    pub fn failing(mut self, section: &'static str) -> Self {
        self.failing.insert(section);
        self
    }

    /// Filter and limit of every workflow run request
    pub fn run_requests(&self) -> Vec<(Option<String>, Option<usize>)> {
        self.run_requests.lock().unwrap().clone()
    }

    fn check(&self, section: &str) -> Result<(), GitHubError> {
        if self.failing.contains(section) {
            return Err(GitHubError::Status {
                status: 500,
                message: "API error".to_string(),
            });
        }
        Ok(())
    }
}

fn capped<T: Clone>(items: &[T], limit: Option<usize>) -> Vec<T> {
    items.iter().take(limit.unwrap_or(usize::MAX)).cloned().collect()
}

#[async_trait]
impl GitHubApi for MockGitHub {
    async fn repository(&self) -> Result<RepositorySummary, GitHubError> {
        if self.failing.contains("repository") {
            return Err(GitHubError::NotFound("/repos/owner/repo".to_string()));
        }
        Ok(self.summary.clone())
    }

    async fn workflow_runs(
        &self,
        filter: Option<&DateFilter>,
        limit: Option<usize>,
    ) -> Result<Listing<WorkflowRun>, GitHubError> {
        self.run_requests
            .lock()
            .unwrap()
            .push((filter.map(|f| f.to_string()), limit));
        self.check("runs")?;
        Ok(Listing::new(self.runs_total, capped(&self.runs, limit)))
    }

    async fn pull_requests(&self, limit: Option<usize>) -> Result<Listing<PullRequestInfo>, GitHubError> {
        self.check("pulls")?;
        Ok(Listing::new(self.pull_requests.len() as u64, capped(&self.pull_requests, limit)))
    }

    async fn commits(&self, limit: Option<usize>) -> Result<Listing<CommitInfo>, GitHubError> {
        self.check("commits")?;
        Ok(Listing::new(self.commits.len() as u64, capped(&self.commits, limit)))
    }

    async fn contributors(&self) -> Result<Listing<ContributorInfo>, GitHubError> {
        self.check("contributors")?;
        Ok(Listing::new(self.contributors.len() as u64, self.contributors.clone()))
    }
}

/// A workflow run created at `created_at` (`YYYY-MM-DD HH:MM:SS`, UTC)
pub fn run(id: u64, author: &str, conclusion: &str, attempt: u32, created_at: &str) -> WorkflowRun {
    let naive = chrono::NaiveDateTime::parse_from_str(created_at, "%Y-%m-%d %H:%M:%S").unwrap();
    WorkflowRun {
        id,
        author: Some(author.to_string()),
        workflow_name: "CI".to_string(),
        pr_name: format!("Change {}", id),
        status: "completed".to_string(),
        conclusion: Some(conclusion.to_string()),
        head_branch: Some("feature".to_string()),
        base_branch: Some("main".to_string()),
        pull_requests_count: 1,
        run_attempt: attempt,
        run_number: id,
        created_at: Utc.from_utc_datetime(&naive),
    }
}

/// REST payload of a workflow run
pub fn run_json(id: u64, actor: &str, conclusion: &str, attempt: u32, created_at: &str) -> Value {
    json!({
        "id": id,
        "name": "CI",
        "display_title": format!("Change {}", id),
        "status": "completed",
        "conclusion": conclusion,
        "head_branch": "feature",
        "pull_requests": [{"number": id, "base": {"ref": "main", "sha": "abc"}}],
        "run_attempt": attempt,
        "run_number": id,
        "created_at": created_at,
        "actor": {"login": actor, "id": 1}
    })
}

pub fn repository_json() -> Value {
    json!({
        "id": 1,
        "full_name": "owner/repo",
        "html_url": "https://github.com/owner/repo",
        "stargazers_count": 42,
        "forks_count": 7,
        "created_at": "2023-01-01T10:00:00Z",
        "updated_at": "2023-06-01T10:00:00Z"
    })
}

pub fn pull_request_json(number: u64, user: &str) -> Value {
    json!({
        "number": number,
        "title": format!("PR {}", number),
        "state": "open",
        "created_at": "2024-01-02T03:04:05Z",
        "user": {"login": user},
        "html_url": format!("https://github.com/owner/repo/pull/{}", number)
    })
}

pub fn commit_json(sha: &str, login: Option<&str>, message: &str) -> Value {
    json!({
        "sha": sha,
        "html_url": format!("https://github.com/owner/repo/commit/{}", sha),
        "author": login.map(|l| json!({"login": l})),
        "commit": {
            "message": message,
            "author": {"name": "Someone", "date": "2024-01-02T03:04:05Z"}
        }
    })
}

pub fn contributor_json(login: &str, contributions: u64) -> Value {
    json!({
        "login": login,
        "contributions": contributions,
        "html_url": format!("https://github.com/{}", login)
    })
}
