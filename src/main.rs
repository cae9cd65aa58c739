use anyhow::{Context, Result};
use chrono::Local;
use performance_calculator::analysis::{calculate, RepositoryAnalyzer};
use performance_calculator::cli::commands::{
    AnalyzeCommand, ConfigCommand, FetchCommand, ListCommand, PerformanceCommand,
};
use performance_calculator::cli::output::*;
use performance_calculator::cli::{Cli, Command};
use performance_calculator::core::{
    BuildRecord, DateFilter, RepositoryReport, RepositoryTarget, Settings, SettingsOverrides,
};
use performance_calculator::github::{GitHubClient, GitHubClientConfig};
use performance_calculator::results::store::read_builds;
use performance_calculator::results::{CsvResultsStore, ResultsStore};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Load .env before anything reads the environment, RUST_LOG included
    let dotenv = dotenvy::dotenv();

    // Initialize logging; RUST_LOG overrides the verbosity flag
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to set logging subscriber")?;

    if let Ok(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    // Execute command
    match &cli.command {
        Command::Analyze(cmd) => analyze_repository(cmd, &cli).await?,
        Command::Fetch(cmd) => fetch_builds(cmd, &cli).await?,
        Command::Performance(cmd) => calculate_performance(cmd, &cli)?,
        Command::List(cmd) => list_results(cmd, &cli)?,
        Command::Config(cmd) => show_config(cmd, &cli)?,
    }

    Ok(())
}

fn load_settings(cli: &Cli, mut overrides: SettingsOverrides) -> Result<Settings> {
    overrides.results_dir = cli.results_dir.clone();
    Settings::load(cli.config.as_deref(), overrides).context("Failed to load configuration")
}

fn client_for(settings: &Settings, target: &RepositoryTarget) -> Result<GitHubClient> {
    GitHubClient::new(
        GitHubClientConfig::from_settings(settings, target),
        &target.owner,
        &target.repo,
    )
    .context("Failed to create GitHub client")
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

async fn analyze_repository(cmd: &AnalyzeCommand, cli: &Cli) -> Result<()> {
    let settings = load_settings(
        cli,
        SettingsOverrides {
            owner: Some(cmd.owner.clone()),
            repo: Some(cmd.repo.clone()),
            token: cmd.token.clone(),
            ..Default::default()
        },
    )?;

    let target = RepositoryTarget {
        owner: cmd.owner.clone(),
        repo: cmd.repo.clone(),
        token: settings.token.clone(),
    };
    if target.token.is_none() {
        println!("{} No token given, using unauthenticated API access", WARN);
    }

    let mut analyzer = RepositoryAnalyzer::new(client_for(&settings, &target)?);
    let spinner = create_spinner(format!("Analyzing {}", target.full_name()));
    let events = spinner.clone();
    analyzer.add_event_handler(move |event| events.println(format_analysis_event(&event)));

    let result = analyzer.analyze().await;
    spinner.finish_and_clear();
    let report = result.with_context(|| format!("Failed to analyze {}", target.full_name()))?;

    print_report_summary(&report);

    if let Some(output) = &cmd.output {
        write_json(output, &report)?;
        println!("\n{} Full results saved to {}", CHECK, style(output.display()).bold());
    } else {
        print_report_details(&report);
    }

    Ok(())
}

fn print_report_summary(report: &RepositoryReport) {
    let summary = &report.summary;
    println!("\n{}", style("Repository Analysis Summary:").bold());
    println!("  Repository: {}", style(&summary.full_name).bold());
    println!("  URL: {}", style(&summary.html_url).dim());
    println!("  Stars: {}", style(summary.stars).cyan());
    println!("  Forks: {}", style(summary.forks).cyan());
    println!("  Created: {}", summary.created_at);
    println!("  Last Updated: {}", summary.last_updated);
    println!();
    println!("  Workflow Runs (Builds): {}", style(report.builds.total_count).cyan());
    println!("  Pull Requests: {}", style(report.pull_requests.total_count).cyan());
    println!("  Commits: {}", style(report.commits.total_count).cyan());
    println!("  Contributors: {}", style(report.contributors.total_count).cyan());
}

fn print_report_details(report: &RepositoryReport) {
    println!("{}", style(separator()).dim());

    println!("{}", style("Recent Workflow Runs:").bold());
    for run in report.builds.items.iter().take(5) {
        println!("{}", format_run(run));
    }

    println!("\n{}", style("Recent Pull Requests:").bold());
    for pr in report.pull_requests.items.iter().take(5) {
        println!("{}", format_pull_request(pr));
    }

    println!("\n{}", style("Recent Commits:").bold());
    for commit in report.commits.items.iter().take(5) {
        println!("{}", format_commit(commit));
    }

    println!("\n{}", style("Top Contributors:").bold());
    for contributor in report.top_contributors(5) {
        println!("{}", format_contributor(contributor));
    }
}

async fn fetch_builds(cmd: &FetchCommand, cli: &Cli) -> Result<()> {
    let settings = load_settings(cli, SettingsOverrides::default())?;
    let target = settings
        .require_repository()
        .context("Set the repository in the environment, a .env file or the config file")?;

    let filter = DateFilter::resolve(
        cmd.date.as_deref(),
        cmd.start_date,
        cmd.end_date,
        cmd.days,
        Local::now().date_naive(),
    )?;
    if let Some(filter) = &filter {
        println!("{} Date filter: {}", INFO, style(filter).cyan());
    }

    let mut analyzer = RepositoryAnalyzer::new(client_for(&settings, &target)?);
    let spinner = create_spinner(format!("Fetching workflow runs of {}", target.full_name()));
    let events = spinner.clone();
    analyzer.add_event_handler(move |event| events.println(format_analysis_event(&event)));

    let result = analyzer.fetch_builds(filter.as_ref(), cmd.run_limit()).await;
    spinner.finish_and_clear();
    let report = result.with_context(|| format!("Failed to fetch builds of {}", target.full_name()))?;

    let records: Vec<BuildRecord> = report.builds.iter().map(BuildRecord::from).collect();
    for (i, record) in records.iter().enumerate() {
        println!("{}", format_build_record(i, record));
    }

    let store = CsvResultsStore::new(&settings.results_dir);
    let location = store
        .save_builds(&records)
        .context("Failed to save workflow data")?;
    println!(
        "\n{} {} of {} runs saved to {}",
        CHECK,
        style(records.len()).cyan(),
        report.total_count,
        style(&location).bold()
    );

    if let Some(output) = &cmd.output {
        write_json(output, &report)?;
        println!("{} Runs saved to {}", CHECK, style(output.display()).bold());
    }

    Ok(())
}

fn calculate_performance(cmd: &PerformanceCommand, cli: &Cli) -> Result<()> {
    let settings = load_settings(cli, SettingsOverrides::default())?;
    let store = CsvResultsStore::new(&settings.results_dir);

    let (source, records) = match &cmd.input {
        Some(path) => (
            path.display().to_string(),
            read_builds(path).context("Failed to read workflow data")?,
        ),
        None => {
            let (location, records) = store
                .latest_builds()
                .context("Run `perfcalc fetch` first")?;
            (location.name, records)
        }
    };
    println!("{} Using data from: {}", INFO, style(&source).bold());

    let rows = calculate(&records);
    if rows.is_empty() {
        println!("{} No builds to evaluate", WARN);
    }
    for row in &rows {
        println!("{}", format_performance_row(row));
    }

    let location = store
        .save_performance(&rows)
        .context("Failed to save performance results")?;
    println!("\n{} Results saved to: {}", CHECK, style(&location).bold());

    Ok(())
}

fn list_results(cmd: &ListCommand, cli: &Cli) -> Result<()> {
    let settings = load_settings(cli, SettingsOverrides::default())?;
    let store = CsvResultsStore::new(&settings.results_dir);
    let locations = store.list(cmd.kind.into())?;

    if cmd.json {
        let reports: Vec<_> = locations
            .iter()
            .map(|l| {
                serde_json::json!({
                    "name": l.name,
                    "path": l.path,
                    "created_at": l.timestamp.to_string(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "reports": reports }))?);
        return Ok(());
    }

    if locations.is_empty() {
        println!("{} No reports found in {}", INFO, settings.results_dir.display());
        return Ok(());
    }

    println!("{} Reports in {}:", INFO, style(settings.results_dir.display()).bold());
    for location in locations.iter().rev() {
        println!("  {} {}", style(&location.name).bold(), style(location.timestamp).dim());
    }

    Ok(())
}

fn show_config(cmd: &ConfigCommand, cli: &Cli) -> Result<()> {
    let settings = load_settings(cli, SettingsOverrides::default())?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let unset = || style("(unset)").dim().to_string();
    println!("{} Resolved configuration", INFO);
    println!("  Owner: {}", settings.owner.clone().unwrap_or_else(unset));
    println!("  Repo: {}", settings.repo.clone().unwrap_or_else(unset));
    println!(
        "  Token: {}",
        if settings.token.is_some() { "***".to_string() } else { unset() }
    );
    println!("  API URL: {}", settings.api_url);
    println!("  Results dir: {}", settings.results_dir.display());
    println!("  Timeout: {}s", settings.timeout_secs);

    Ok(())
}
