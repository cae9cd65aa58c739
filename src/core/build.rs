//! Workflow runs (builds) and their raw-data CSV rows

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format used in reports and the raw-data CSV
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single GitHub Actions workflow run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,

    /// Login of the actor that triggered the run
    pub author: Option<String>,

    pub workflow_name: String,

    /// Display title of the run (PR or commit title)
    pub pr_name: String,

    pub status: String,

    /// `success`, `failure`, `cancelled`, ... or none while still running
    pub conclusion: Option<String>,

    pub head_branch: Option<String>,

    /// Base ref of the first pull request linked to the run
    pub base_branch: Option<String>,

    pub pull_requests_count: usize,

    pub run_attempt: u32,

    pub run_number: u64,

    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// One row of the raw-data CSV
///
/// Field order is the column order of the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub author: Option<String>,
    pub workflow_name: String,
    pub pr_name: String,
    pub conclusion: Option<String>,
    pub head_branch: Option<String>,
    pub base_branch: Option<String>,
    pub run_attempt: u32,
    #[serde(with = "naive_timestamp")]
    pub created_at: NaiveDateTime,
}

impl BuildRecord {
    pub const HEADERS: [&'static str; 8] = [
        "author",
        "workflow_name",
        "pr_name",
        "conclusion",
        "head_branch",
        "base_branch",
        "run_attempt",
        "created_at",
    ];

    /// Cells as they appear in the CSV, with missing values empty
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.author.clone().unwrap_or_default(),
            self.workflow_name.clone(),
            self.pr_name.clone(),
            self.conclusion.clone().unwrap_or_default(),
            self.head_branch.clone().unwrap_or_default(),
            self.base_branch.clone().unwrap_or_default(),
            self.run_attempt.to_string(),
            self.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ]
    }

    pub fn is_success(&self) -> bool {
        self.conclusion.as_deref() == Some("success")
    }

    pub fn is_failure(&self) -> bool {
        self.conclusion.as_deref() == Some("failure")
    }
}

impl From<&WorkflowRun> for BuildRecord {
    fn from(run: &WorkflowRun) -> Self {
        Self {
            author: run.author.clone(),
            workflow_name: run.workflow_name.clone(),
            pr_name: run.pr_name.clone(),
            conclusion: run.conclusion.clone(),
            head_branch: run.head_branch.clone(),
            base_branch: run.base_branch.clone(),
            run_attempt: run.run_attempt,
            created_at: run.created_at.naive_utc(),
        }
    }
}

/// Serde adapter for `DateTime<Utc>` in `TIMESTAMP_FORMAT`
pub mod timestamp {
    use super::TIMESTAMP_FORMAT;
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `NaiveDateTime` in `TIMESTAMP_FORMAT`
pub mod naive_timestamp {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
