//! CLI output formatting

use crate::analysis::{AnalysisEvent, AuthorWeekPerformance, BuildRatio};
use crate::core::{BuildRecord, CommitInfo, ContributorInfo, PullRequestInfo, WorkflowRun, TIMESTAMP_FORMAT};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a spinner shown while requests are in flight
pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// A horizontal rule as wide as the terminal
pub fn separator() -> String {
    let width = term_size::dimensions_stdout()
        .map(|(w, _)| w)
        .unwrap_or(80);
    "─".repeat(width)
}

/// Format an analysis event for display
pub fn format_analysis_event(event: &AnalysisEvent) -> String {
    match event {
        AnalysisEvent::RepositoryLoaded { repository } => {
            format!("{} Analyzing repository: {}", ROCKET, style(repository).bold())
        }
        AnalysisEvent::SectionStarted { section } => {
            format!("{} Fetching {}", SPINNER, style(section).cyan())
        }
        AnalysisEvent::SectionFetched {
            section,
            fetched,
            total,
        } => format!(
            "{} {} ({} of {})",
            CHECK,
            style(section).green(),
            fetched,
            style(total).dim()
        ),
        AnalysisEvent::SectionFailed { section, error } => {
            format!("{} Error getting {}: {}", CROSS, style(section).red(), style(error).dim())
        }
    }
}

pub fn format_conclusion(conclusion: Option<&str>) -> String {
    match conclusion {
        Some("success") => style("success").green().to_string(),
        Some("failure") => style("failure").red().to_string(),
        Some(other) => style(other).yellow().to_string(),
        None => style("None").dim().to_string(),
    }
}

pub fn format_run(run: &WorkflowRun) -> String {
    format!(
        "  - {} ({}/{}) on {} at {}",
        run.workflow_name,
        run.status,
        format_conclusion(run.conclusion.as_deref()),
        run.head_branch.as_deref().unwrap_or("None"),
        style(run.created_at.format(TIMESTAMP_FORMAT)).dim()
    )
}

pub fn format_pull_request(pr: &PullRequestInfo) -> String {
    format!(
        "  - #{} {} by {} ({}) created at {}",
        pr.number,
        pr.title,
        style(&pr.user).cyan(),
        pr.state,
        style(pr.created_at.format(TIMESTAMP_FORMAT)).dim()
    )
}

pub fn format_commit(commit: &CommitInfo) -> String {
    format!(
        "  - {} {} by {} at {}",
        style(commit.short_sha()).yellow(),
        commit.message,
        style(&commit.author).cyan(),
        style(commit.date.format(TIMESTAMP_FORMAT)).dim()
    )
}

pub fn format_contributor(contributor: &ContributorInfo) -> String {
    format!(
        "  - {} ({} contributions)",
        style(&contributor.login).bold(),
        contributor.contributions
    )
}

/// `N: a,b,c` line echoed for every exported build
pub fn format_build_record(index: usize, record: &BuildRecord) -> String {
    format!("{}: {}", index + 1, record.cells().join(","))
}

pub fn format_ratio(ratio: BuildRatio) -> String {
    match ratio {
        BuildRatio::Infinite => style(ratio).green().to_string(),
        BuildRatio::NoBuilds => style(ratio).dim().to_string(),
        BuildRatio::Ratio(r) if r >= 1.0 => style(ratio).green().to_string(),
        BuildRatio::Ratio(_) => style(ratio).red().to_string(),
    }
}

pub fn format_performance_row(row: &AuthorWeekPerformance) -> String {
    let author = if row.author.is_empty() { "(unknown)" } else { row.author.as_str() };
    format!(
        "  {} {} {} ({} success, {} failure)",
        style(author).bold(),
        style(&row.date_range).dim(),
        format_ratio(row.build_ratio),
        row.stats.success,
        row.stats.failure
    )
}
