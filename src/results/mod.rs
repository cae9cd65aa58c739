//! Storage for generated raw-data and performance reports

pub mod store;

pub use store::CsvResultsStore;

use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

use crate::analysis::AuthorWeekPerformance;
use crate::core::BuildRecord;

/// Timestamp suffix of report names
pub const NAME_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error in {location}: {source}")]
    Csv {
        location: String,
        source: csv::Error,
    },

    #[error("No GitHub workflow data files found in {0}")]
    NoBuildData(String),
}

/// Kind of a stored report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKind {
    /// Raw workflow runs exported by `fetch`
    WorkflowData,
    /// Per-author weekly ratios computed by `performance`
    Performance,
}

impl ResultKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            ResultKind::WorkflowData => "github_workflow_data_",
            ResultKind::Performance => "github_performance_by_author_",
        }
    }

    /// `<prefix><YYYYmmdd_HHMMSS>.csv`
    pub fn file_name(&self, timestamp: NaiveDateTime) -> String {
        format!("{}{}.csv", self.prefix(), timestamp.format(NAME_TIMESTAMP_FORMAT))
    }

    /// Timestamp encoded in a report name of this kind
    pub fn parse_file_name(&self, name: &str) -> Option<NaiveDateTime> {
        let stamp = name.strip_prefix(self.prefix())?.strip_suffix(".csv")?;
        NaiveDateTime::parse_from_str(stamp, NAME_TIMESTAMP_FORMAT).ok()
    }
}

/// Where a report was stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLocation {
    pub kind: ResultKind,
    pub name: String,
    pub timestamp: NaiveDateTime,
    /// Set for reports on disk
    pub path: Option<PathBuf>,
}

impl fmt::Display for ResultLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}", path.display()),
            None => f.write_str(&self.name),
        }
    }
}

/// Trait for report storage backends
pub trait ResultsStore: Send + Sync {
    /// Save a raw-data report
    fn save_builds(&self, records: &[BuildRecord]) -> Result<ResultLocation, ResultsError>;

    /// Load the newest raw-data report
    fn latest_builds(&self) -> Result<(ResultLocation, Vec<BuildRecord>), ResultsError>;

    /// Save a performance report
    fn save_performance(&self, rows: &[AuthorWeekPerformance]) -> Result<ResultLocation, ResultsError>;

    /// Stored reports of `kind`, oldest first
    fn list(&self, kind: ResultKind) -> Result<Vec<ResultLocation>, ResultsError>;
}

/// Clock used to stamp report names
pub type Clock = fn() -> NaiveDateTime;

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// In-memory storage (for testing or dry runs)
pub struct InMemoryResults {
    clock: Clock,
    builds: Mutex<Vec<(ResultLocation, Vec<BuildRecord>)>>,
    performance: Mutex<Vec<(ResultLocation, Vec<AuthorWeekPerformance>)>>,
}

impl InMemoryResults {
    pub fn new() -> Self {
        Self::with_clock(local_now)
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            builds: Mutex::new(Vec::new()),
            performance: Mutex::new(Vec::new()),
        }
    }

    fn location(&self, kind: ResultKind) -> ResultLocation {
        let timestamp = (self.clock)();
        ResultLocation {
            kind,
            name: kind.file_name(timestamp),
            timestamp,
            path: None,
        }
    }

    /// Rows of the performance reports saved so far
    pub fn performance_reports(&self) -> Vec<Vec<AuthorWeekPerformance>> {
        lock(&self.performance).iter().map(|(_, rows)| rows.clone()).collect()
    }
}

impl Default for InMemoryResults {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ResultsStore for InMemoryResults {
    fn save_builds(&self, records: &[BuildRecord]) -> Result<ResultLocation, ResultsError> {
        let location = self.location(ResultKind::WorkflowData);
        lock(&self.builds).push((location.clone(), records.to_vec()));
        Ok(location)
    }

    fn latest_builds(&self) -> Result<(ResultLocation, Vec<BuildRecord>), ResultsError> {
        lock(&self.builds)
            .iter()
            .max_by_key(|(location, _)| location.timestamp)
            .cloned()
            .ok_or_else(|| ResultsError::NoBuildData("memory".to_string()))
    }

    fn save_performance(&self, rows: &[AuthorWeekPerformance]) -> Result<ResultLocation, ResultsError> {
        let location = self.location(ResultKind::Performance);
        lock(&self.performance).push((location.clone(), rows.to_vec()));
        Ok(location)
    }

    fn list(&self, kind: ResultKind) -> Result<Vec<ResultLocation>, ResultsError> {
        let mut locations: Vec<ResultLocation> = match kind {
            ResultKind::WorkflowData => lock(&self.builds).iter().map(|(l, _)| l.clone()).collect(),
            ResultKind::Performance => lock(&self.performance).iter().map(|(l, _)| l.clone()).collect(),
        };
        locations.sort_by_key(|l| l.timestamp);
        Ok(locations)
    }
}
