//! Core domain models
//!
//! This module defines the data structures shared by the GitHub client,
//! the analysis code and the report store, plus configuration.

pub mod build;
pub mod config;
pub mod date_filter;
pub mod repository;

pub use build::*;
pub use config::{ConfigError, RepositoryTarget, Settings, SettingsOverrides};
pub use date_filter::DateFilter;
pub use repository::*;
