//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{AnalyzeCommand, ConfigCommand, FetchCommand, ListCommand, PerformanceCommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Build performance calculator for GitHub Actions
#[derive(Debug, Parser, Clone)]
#[command(name = "perfcalc")]
#[command(author = "Performance Calculator Contributors")]
#[command(version)]
#[command(about = "Analyze GitHub repositories and per-author build performance", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for generated CSV reports
    #[arg(long, global = true)]
    pub results_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Analyze a repository
    Analyze(AnalyzeCommand),

    /// Export workflow runs to a raw-data CSV
    Fetch(FetchCommand),

    /// Calculate weekly build ratios per author
    Performance(PerformanceCommand),

    /// List stored reports
    List(ListCommand),

    /// Show the resolved configuration
    Config(ConfigCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
