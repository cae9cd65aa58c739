//! GitHub client configuration and REST implementation

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::core::config::{Settings, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::core::{
    CommitInfo, ContributorInfo, DateFilter, Listing, PullRequestInfo, RepositorySummary,
    RepositoryTarget, WorkflowRun,
};
use crate::github::http::HttpClient;
use crate::github::response::{
    ApiCommit, ApiContributor, ApiPullRequest, ApiRepository, ApiWorkflowRuns, GitHubError,
};
use crate::github::GitHubApi;

/// Largest page size the REST API accepts
pub const PER_PAGE: usize = 100;

/// Configuration for the GitHub client
#[derive(Debug, Clone)]
pub struct GitHubClientConfig {
    /// Base URL of the REST API
    pub api_url: String,

    /// Personal access token; requests are unauthenticated without one
    pub token: Option<String>,

    /// Timeout for requests in seconds
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: Settings::default().user_agent,
        }
    }
}

impl GitHubClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration matching resolved settings, with the token of `target`
    pub fn from_settings(settings: &Settings, target: &RepositoryTarget) -> Self {
        Self {
            api_url: settings.api_url.clone(),
            token: target.token.clone(),
            timeout_secs: settings.timeout_secs,
            user_agent: settings.user_agent.clone(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// GitHub REST client bound to one repository
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: HttpClient,
    owner: String,
    repo: String,
}

impl GitHubClient {
    pub fn new(
        config: GitHubClientConfig,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Result<Self, GitHubError> {
        Ok(Self {
            http: HttpClient::new(&config)?,
            owner: owner.into(),
            repo: repo.into(),
        })
    }

    fn repo_path(&self, suffix: &str) -> String {
        format!("/repos/{}/{}{}", self.owner, self.repo, suffix)
    }

    /// Fetch array pages until a short page, no `next` link, or `limit` items
    async fn paginate<T, R>(
        &self,
        path: &str,
        query: &[(&str, String)],
        limit: Option<usize>,
    ) -> Result<Vec<R>, GitHubError>
    where
        T: DeserializeOwned,
        R: TryFrom<T>,
        R::Error: std::fmt::Display,
    {
        let mut items = Vec::new();
        let mut page_number = 1usize;
        let per_page = page_size(limit);

        loop {
            let mut page_query = query.to_vec();
            page_query.push(("per_page", per_page.to_string()));
            page_query.push(("page", page_number.to_string()));

            let page = self.http.get_json::<Vec<T>>(path, &page_query).await?;
            let has_next = page.has_next();
            let fetched = page.body.len();

            for raw in page.body {
                match R::try_from(raw) {
                    Ok(item) => items.push(item),
                    Err(e) => warn!("Skipping item from {}: {}", path, e),
                }
            }

            if fetched < per_page || !has_next || limit.is_some_and(|l| items.len() >= l) {
                break;
            }
            page_number += 1;
        }

        if let Some(limit) = limit {
            items.truncate(limit);
        }
        Ok(items)
    }

    /// Total item count of a list endpoint, read from a `per_page=1` probe
    async fn count_items(&self, path: &str, query: &[(&str, String)]) -> Result<u64, GitHubError> {
        let mut probe_query = query.to_vec();
        probe_query.push(("per_page", "1".to_string()));

        let page = self
            .http
            .get_json::<Vec<serde_json::Value>>(path, &probe_query)
            .await?;

        Ok(page.last_page().unwrap_or(page.body.len() as u64))
    }
}

/// Page size for a listing; it stays fixed so `page=N` offsets line up
fn page_size(limit: Option<usize>) -> usize {
    limit.map_or(PER_PAGE, |limit| limit.clamp(1, PER_PAGE))
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn repository(&self) -> Result<RepositorySummary, GitHubError> {
        let page = self
            .http
            .get_json::<ApiRepository>(&self.repo_path(""), &[])
            .await?;
        Ok(page.body.into())
    }

    async fn workflow_runs(
        &self,
        filter: Option<&DateFilter>,
        limit: Option<usize>,
    ) -> Result<Listing<WorkflowRun>, GitHubError> {
        let path = self.repo_path("/actions/runs");
        let mut query = Vec::new();
        if let Some(filter) = filter {
            query.push(("created", filter.to_string()));
        }

        // Runs come wrapped in an object carrying the total, so they are paged here
        let mut runs: Vec<WorkflowRun> = Vec::new();
        let mut total_count = 0;
        let mut page_number = 1usize;
        let per_page = page_size(limit);

        loop {
            let mut page_query = query.clone();
            page_query.push(("per_page", per_page.to_string()));
            page_query.push(("page", page_number.to_string()));

            let page = self.http.get_json::<ApiWorkflowRuns>(&path, &page_query).await?;
            total_count = page.body.total_count;
            let fetched = page.body.workflow_runs.len();
            runs.extend(page.body.workflow_runs.into_iter().map(WorkflowRun::from));

            let reached_total = runs.len() as u64 >= total_count;
            if fetched < per_page || reached_total || limit.is_some_and(|l| runs.len() >= l) {
                break;
            }
            page_number += 1;
        }

        if let Some(limit) = limit {
            runs.truncate(limit);
        }
        debug!("Fetched {} of {} workflow runs", runs.len(), total_count);

        Ok(Listing::new(total_count, runs))
    }

    async fn pull_requests(&self, limit: Option<usize>) -> Result<Listing<PullRequestInfo>, GitHubError> {
        let path = self.repo_path("/pulls");
        let query = [("state", "all".to_string())];

        let items = self
            .paginate::<ApiPullRequest, PullRequestInfo>(&path, &query, limit)
            .await?;
        let total_count = self.count_items(&path, &query).await?;

        Ok(Listing::new(total_count, items))
    }

    async fn commits(&self, limit: Option<usize>) -> Result<Listing<CommitInfo>, GitHubError> {
        let path = self.repo_path("/commits");

        let items = self.paginate::<ApiCommit, CommitInfo>(&path, &[], limit).await?;
        let total_count = self.count_items(&path, &[]).await?;

        Ok(Listing::new(total_count, items))
    }

    async fn contributors(&self) -> Result<Listing<ContributorInfo>, GitHubError> {
        let items = self
            .paginate::<ApiContributor, ContributorInfo>(&self.repo_path("/contributors"), &[], None)
            .await?;

        Ok(Listing::new(items.len() as u64, items))
    }
}
