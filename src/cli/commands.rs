//! CLI command definitions

use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

use crate::core::date_filter::parse_date;
use crate::results::ResultKind;

/// Analyze a repository: builds, pull requests, commits and contributors
#[derive(Debug, Args, Clone)]
pub struct AnalyzeCommand {
    /// Repository owner (username or organization)
    pub owner: String,

    /// Repository name
    pub repo: String,

    /// GitHub access token (defaults to GITHUB_TOKEN)
    #[arg(short, long)]
    pub token: Option<String>,

    /// Save the full report to this JSON file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Export workflow runs of GITHUB_OWNER/GITHUB_REPO to a raw-data CSV
#[derive(Debug, Args, Clone)]
pub struct FetchCommand {
    /// Filter runs by creation date: YYYY-MM-DD, A..B, or >, >=, <, <= a date
    #[arg(long, help_heading = "Date filtering options")]
    pub date: Option<String>,

    /// Start date for filtering workflow runs (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, help_heading = "Date filtering options")]
    pub start_date: Option<NaiveDate>,

    /// End date for filtering workflow runs (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, help_heading = "Date filtering options")]
    pub end_date: Option<NaiveDate>,

    /// Get workflow runs from the last N days
    #[arg(long, help_heading = "Date filtering options")]
    pub days: Option<u32>,

    /// Limit the number of workflow runs fetched (0 fetches all)
    #[arg(long, help_heading = "Output options")]
    pub limit: Option<usize>,

    /// Also save the fetched runs to this JSON file
    #[arg(long, help_heading = "Output options")]
    pub output: Option<PathBuf>,
}

impl FetchCommand {
    /// Run cap to request; a limit of 0 means no limit
    pub fn run_limit(&self) -> Option<usize> {
        self.limit.filter(|&limit| limit > 0)
    }
}

/// Calculate weekly build ratios per author from the raw-data CSV
#[derive(Debug, Args, Clone)]
pub struct PerformanceCommand {
    /// Raw-data CSV to read instead of the latest one in the results directory
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

/// List stored reports
#[derive(Debug, Args, Clone)]
pub struct ListCommand {
    /// Kind of report to list
    #[arg(long, value_enum, default_value_t = ResultKindArg::WorkflowData)]
    pub kind: ResultKindArg,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Show the resolved configuration
#[derive(Debug, Args, Clone)]
pub struct ConfigCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Report kind argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ResultKindArg {
    WorkflowData,
    Performance,
}

impl From<ResultKindArg> for ResultKind {
    fn from(arg: ResultKindArg) -> Self {
        match arg {
            ResultKindArg::WorkflowData => ResultKind::WorkflowData,
            ResultKindArg::Performance => ResultKind::Performance,
        }
    }
}
