// In crates/analytics/src/lib.rs

pub mod comparator;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod report;
pub mod time_of_day;
pub mod types;

pub use comparator::{ComparisonRow, ComparisonTable, SortOrder, StrategyComparator, StrategyRecord};
pub use engine::AnalyticsEngine;
pub use error::{Error, Result};
pub use time_of_day::{BucketGranularity, BucketKey, BucketStats, TimeAnalysisConfig, TimeOfDayAnalyzer};
pub use types::{Column, PerformanceReport, StatisticalTest};
