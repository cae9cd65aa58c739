//! Repository analysis and build performance calculation

pub mod analyzer;
pub mod performance;

pub use analyzer::{AnalysisError, AnalysisEvent, RepositoryAnalyzer, Section, DEFAULT_SECTION_LIMIT};
pub use performance::{calculate, AuthorWeekPerformance, BuildRatio, WeekStats};
