//! `created` qualifiers for filtering workflow runs by date

use chrono::{Days, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::core::ConfigError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A GitHub search qualifier for the `created` field of a workflow run
///
/// Supported forms:
/// - `2024-01-24` runs created on that day
/// - `2024-01-01..2024-01-31` runs created in that range
/// - `>=2024-01-01`, `>2024-01-01`, `<=2024-01-31`, `<2024-01-31`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateFilter(String);

fn qualifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(>=|<=|>|<)(\d{4}-\d{2}-\d{2})|(\d{4}-\d{2}-\d{2})(?:\.\.(\d{4}-\d{2}-\d{2}))?)$")
            .expect("date qualifier regex is valid")
    })
}

impl DateFilter {
    /// Parse and validate a raw `--date` value
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        let invalid = || ConfigError::InvalidDateFilter(raw.to_string());

        let caps = qualifier_regex().captures(raw).ok_or_else(invalid)?;
        for idx in 2..=4 {
            if let Some(m) = caps.get(idx) {
                parse_date(m.as_str()).map_err(|_| invalid())?;
            }
        }

        if let (Some(start), Some(end)) = (caps.get(3), caps.get(4)) {
            if start.as_str() > end.as_str() {
                return Err(invalid());
            }
        }

        Ok(Self(raw.to_string()))
    }

    /// Build a filter from range options
    ///
    /// `days` counts back from `today` and overrides `start`; `end` then
    /// defaults to `today`. Returns `None` when nothing was given, and an
    /// error when `days` reaches before the earliest representable date.
    pub fn from_range(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        days: Option<u32>,
        today: NaiveDate,
    ) -> Result<Option<Self>, ConfigError> {
        let (start, end) = match days {
            Some(days) => {
                let start = today
                    .checked_sub_days(Days::new(days.into()))
                    .ok_or_else(|| ConfigError::InvalidDateFilter(format!("--days {}", days)))?;
                (Some(start), Some(end.unwrap_or(today)))
            }
            None => (start, end),
        };

        let qualifier = match (start, end) {
            (Some(start), Some(end)) => format!(
                "{}..{}",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            ),
            (Some(start), None) => format!(">={}", start.format(DATE_FORMAT)),
            (None, Some(end)) => format!("<={}", end.format(DATE_FORMAT)),
            (None, None) => return Ok(None),
        };

        Ok(Some(Self(qualifier)))
    }

    /// Resolve the filter from all CLI options; an explicit `date` wins
    pub fn resolve(
        date: Option<&str>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        days: Option<u32>,
        today: NaiveDate,
    ) -> Result<Option<Self>, ConfigError> {
        match date {
            Some(raw) => Self::parse(raw).map(Some),
            None => Self::from_range(start, end, days, today),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a `YYYY-MM-DD` date, as accepted by `--start-date` and `--end-date`
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| format!("Invalid date '{}' (expected YYYY-MM-DD): {}", s, e))
}
