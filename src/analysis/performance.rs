//! Weekly build success ratio per author

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::BuildRecord;

/// Successful builds divided by failed builds (retries count as failures)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuildRatio {
    /// Neither successes nor failures in the week
    NoBuilds,
    /// Rounded to two decimals
    Ratio(f64),
    /// Successes without a single failure
    Infinite,
}

impl BuildRatio {
    pub fn from_counts(success: u32, failure: u32) -> Self {
        match (success, failure) {
            (0, 0) => BuildRatio::NoBuilds,
            (_, 0) => BuildRatio::Infinite,
            (s, f) => BuildRatio::Ratio(round2(f64::from(s) / f64::from(f))),
        }
    }
}

/// Two decimals, halves to even: 0.625 becomes 0.62
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

impl fmt::Display for BuildRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildRatio::NoBuilds => f.write_str("0"),
            BuildRatio::Infinite => f.write_str("inf"),
            // Whole numbers keep one decimal: 2.0, not 2
            BuildRatio::Ratio(r) if r.fract() == 0.0 => write!(f, "{:.1}", r),
            BuildRatio::Ratio(r) => write!(f, "{}", r),
        }
    }
}

impl Serialize for BuildRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Success and failure counts for one author in one week
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekStats {
    pub success: u32,
    pub failure: u32,
}

impl WeekStats {
    /// Count one build; every attempt past the first is a failure
    ///
    /// Counters saturate at `u32::MAX`.
    pub fn record(&mut self, record: &BuildRecord) {
        if record.is_success() {
            self.success = self.success.saturating_add(1);
        } else if record.is_failure() {
            self.failure = self.failure.saturating_add(1);
        }
        self.failure = self.failure.saturating_add(record.run_attempt.saturating_sub(1));
    }
}

/// One row of the performance report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorWeekPerformance {
    pub author: String,
    /// `YYYY-MM-DD...YYYY-MM-DD`, Monday through Sunday
    pub date_range: String,
    pub build_ratio: BuildRatio,
    #[serde(skip)]
    pub week_start: NaiveDate,
    #[serde(skip)]
    pub stats: WeekStats,
}

impl AuthorWeekPerformance {
    pub const HEADERS: [&'static str; 3] = ["author", "date_range", "build_ratio"];
}

/// Monday and Sunday of the week containing `date`
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    (start, start + Duration::days(6))
}

pub fn format_week(start: NaiveDate, end: NaiveDate) -> String {
    format!("{}...{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
}

/// Group builds by author and week and compute each build ratio
///
/// Rows are ordered by author, then by week. Builds without an author are
/// grouped under an empty name.
pub fn calculate(records: &[BuildRecord]) -> Vec<AuthorWeekPerformance> {
    let mut buckets: BTreeMap<(String, NaiveDate), WeekStats> = BTreeMap::new();

    for record in records {
        let (week_start, _) = week_bounds(record.created_at.date());
        let author = record.author.clone().unwrap_or_default();
        buckets.entry((author, week_start)).or_default().record(record);
    }

    buckets
        .into_iter()
        .map(|((author, week_start), stats)| {
            let (start, end) = week_bounds(week_start);
            AuthorWeekPerformance {
                author,
                date_range: format_week(start, end),
                build_ratio: BuildRatio::from_counts(stats.success, stats.failure),
                week_start,
                stats,
            }
        })
        .collect()
}
