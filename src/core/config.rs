//! Layered settings: defaults, YAML file, environment, CLI flags

use serde::{Deserialize, Serialize, Serializer};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_RESULTS_DIR: &str = "results";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variables read on top of the config file
pub const ENV_OWNER: &str = "GITHUB_OWNER";
pub const ENV_REPO: &str = "GITHUB_REPO";
pub const ENV_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_API_URL: &str = "GITHUB_API_URL";
pub const ENV_RESULTS_DIR: &str = "PERFCALC_RESULTS_DIR";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Missing required settings: {}", .0.join(", "))]
    MissingSetting(Vec<&'static str>),

    #[error("Invalid date filter '{0}': expected YYYY-MM-DD, A..B, or a >, >=, <, <= prefix")]
    InvalidDateFilter(String),
}

/// Settings as written in the YAML config file; every key is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub results_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl FileSettings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file is a valid, empty config
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }
}

/// Values passed on the command line, highest precedence
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub token: Option<String>,
    pub results_dir: Option<PathBuf>,
}

/// Fully resolved settings
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub owner: Option<String>,
    pub repo: Option<String>,
    #[serde(serialize_with = "redact_token")]
    pub token: Option<String>,
    pub api_url: String,
    pub results_dir: PathBuf,
    pub timeout_secs: u64,
    pub user_agent: String,
}

fn redact_token<S: Serializer>(token: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match token {
        Some(_) => serializer.serialize_some("***"),
        None => serializer.serialize_none(),
    }
}

/// The repository a command operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTarget {
    pub owner: String,
    pub repo: String,
    pub token: Option<String>,
}

impl RepositoryTarget {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            token: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            owner: None,
            repo: None,
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("performance-calculator/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Settings {
    /// Load settings from every layer
    ///
    /// An explicit `config_path` must exist; the default location under the
    /// user config directory is only read when present.
    pub fn load(
        config_path: Option<&Path>,
        overrides: SettingsOverrides,
    ) -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        let file = match config_path {
            Some(path) => Some(FileSettings::from_file(path)?),
            None => match default_config_path() {
                Some(path) if path.exists() => {
                    debug!("Using config file {}", path.display());
                    Some(FileSettings::from_file(&path)?)
                }
                _ => None,
            },
        };

        if let Some(file) = file {
            settings.apply_file(file);
        }
        settings.apply_env(|key| std::env::var(key).ok());
        settings.apply_overrides(overrides);

        Ok(settings)
    }

    pub fn apply_file(&mut self, file: FileSettings) {
        set_if_some(&mut self.owner, file.owner);
        set_if_some(&mut self.repo, file.repo);
        set_if_some(&mut self.token, file.token);
        if let Some(api_url) = file.api_url {
            self.api_url = api_url;
        }
        if let Some(results_dir) = file.results_dir {
            self.results_dir = results_dir;
        }
        if let Some(timeout_secs) = file.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
    }

    /// Apply environment variables; empty values count as unset
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        set_if_some(&mut self.owner, get(ENV_OWNER));
        set_if_some(&mut self.repo, get(ENV_REPO));
        set_if_some(&mut self.token, get(ENV_TOKEN));
        if let Some(api_url) = get(ENV_API_URL) {
            self.api_url = api_url;
        }
        if let Some(dir) = get(ENV_RESULTS_DIR) {
            self.results_dir = PathBuf::from(dir);
        }
    }

    pub fn apply_overrides(&mut self, overrides: SettingsOverrides) {
        set_if_some(&mut self.owner, overrides.owner);
        set_if_some(&mut self.repo, overrides.repo);
        set_if_some(&mut self.token, overrides.token);
        if let Some(dir) = overrides.results_dir {
            self.results_dir = dir;
        }
    }

    /// Require owner, repo and token, reporting every missing one
    pub fn require_repository(&self) -> Result<RepositoryTarget, ConfigError> {
        let mut missing = Vec::new();
        if self.owner.is_none() {
            missing.push(ENV_OWNER);
        }
        if self.repo.is_none() {
            missing.push(ENV_REPO);
        }
        if self.token.is_none() {
            missing.push(ENV_TOKEN);
        }

        match (&self.owner, &self.repo, &self.token) {
            (Some(owner), Some(repo), Some(token)) => Ok(RepositoryTarget {
                owner: owner.clone(),
                repo: repo.clone(),
                token: Some(token.clone()),
            }),
            _ => Err(ConfigError::MissingSetting(missing)),
        }
    }
}

fn set_if_some<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// `<config dir>/performance-calculator/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("performance-calculator").join("config.yaml"))
}
