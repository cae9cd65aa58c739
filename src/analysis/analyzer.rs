//! Repository analyzer - gathers builds, pull requests, commits and contributors

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::{BuildsReport, DateFilter, Listing, RepositoryReport};
use crate::github::{GitHubApi, GitHubError};

/// Cap applied to runs, pull requests and commits in a full analysis
pub const DEFAULT_SECTION_LIMIT: usize = 100;

/// Errors that abort an analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Error analyzing repository: {0}")]
    Repository(#[source] GitHubError),
}

/// Parts of a repository report fetched independently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Builds,
    PullRequests,
    Commits,
    Contributors,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Builds => "workflow runs",
            Section::PullRequests => "pull requests",
            Section::Commits => "commits",
            Section::Contributors => "contributors",
        };
        f.write_str(name)
    }
}

/// Events that can occur during an analysis
#[derive(Debug, Clone)]
pub enum AnalysisEvent {
    RepositoryLoaded {
        repository: String,
    },
    SectionStarted {
        section: Section,
    },
    SectionFetched {
        section: Section,
        fetched: usize,
        total: u64,
    },
    SectionFailed {
        section: Section,
        error: String,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(AnalysisEvent) + Send + Sync>;

pub struct RepositoryAnalyzer<A> {
    api: A,
    section_limit: usize,
    event_handlers: Vec<EventHandler>,
}

impl<A: GitHubApi> RepositoryAnalyzer<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            section_limit: DEFAULT_SECTION_LIMIT,
            event_handlers: Vec::new(),
        }
    }

    pub fn with_section_limit(mut self, limit: usize) -> Self {
        self.section_limit = limit;
        self
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(AnalysisEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    fn emit_event(&self, event: AnalysisEvent) {
        for handler in &self.event_handlers {
            handler(event.clone());
        }
    }

    /// Run a full analysis
    ///
    /// The repository lookup must succeed; every other section falls back to
    /// an empty listing when its request fails.
    pub async fn analyze(&self) -> Result<RepositoryReport, AnalysisError> {
        let summary = self.api.repository().await.map_err(AnalysisError::Repository)?;
        info!("Analyzing repository: {}", summary.full_name);
        self.emit_event(AnalysisEvent::RepositoryLoaded {
            repository: summary.full_name.clone(),
        });

        let limit = Some(self.section_limit);
        let builds = self
            .section(Section::Builds, self.api.workflow_runs(None, limit))
            .await;
        let pull_requests = self
            .section(Section::PullRequests, self.api.pull_requests(limit))
            .await;
        let commits = self.section(Section::Commits, self.api.commits(limit)).await;
        let contributors = self
            .section(Section::Contributors, self.api.contributors())
            .await;

        Ok(RepositoryReport {
            summary,
            builds,
            pull_requests,
            commits,
            contributors,
        })
    }

    /// Fetch only the workflow runs, for the raw-data export
    pub async fn fetch_builds(
        &self,
        filter: Option<&DateFilter>,
        limit: Option<usize>,
    ) -> Result<BuildsReport, AnalysisError> {
        let summary = self.api.repository().await.map_err(AnalysisError::Repository)?;
        self.emit_event(AnalysisEvent::RepositoryLoaded {
            repository: summary.full_name.clone(),
        });

        if let Some(filter) = filter {
            info!("Filtering workflow runs by created {}", filter);
        }
        let runs = self
            .section(Section::Builds, self.api.workflow_runs(filter, limit))
            .await;

        Ok(BuildsReport {
            repository: summary.full_name,
            url: summary.html_url,
            total_count: runs.total_count,
            builds: runs.items,
        })
    }

    async fn section<T, F>(&self, section: Section, request: F) -> Listing<T>
    where
        F: Future<Output = Result<Listing<T>, GitHubError>>,
    {
        self.emit_event(AnalysisEvent::SectionStarted { section });

        match request.await {
            Ok(listing) => {
                self.emit_event(AnalysisEvent::SectionFetched {
                    section,
                    fetched: listing.items.len(),
                    total: listing.total_count,
                });
                listing
            }
            Err(e) => {
                warn!("Error getting {}: {}", section, e);
                self.emit_event(AnalysisEvent::SectionFailed {
                    section,
                    error: e.to_string(),
                });
                Listing::empty()
            }
        }
    }
}
