//! Scenario tests for repository analysis and the performance pipeline

#[path = "../support/mod.rs"]
mod support;

mod analyze_report;
mod fetch_builds;
mod partial_failure;
mod performance_pipeline;
