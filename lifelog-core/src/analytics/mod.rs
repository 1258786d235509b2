//! Analytics module for lifelog
//!
//! Aggregates the four record collections into daily trends and range-wide
//! summaries:
//! - Range resolution (week / month / year ending today)
//! - Gap-free day buckets
//! - Per-domain folding (average, sum, income/expense net)
//! - Summary statistics
//! - Single-day totals
//!
//! See [`engine`] for the aggregator that ties these together.

pub mod calendar;
pub mod daily;
pub mod engine;
pub mod finance;
pub mod range;
pub mod store;
pub mod summary;
pub mod trend;

pub use calendar::CalendarZone;
pub use daily::DailySummary;
pub use engine::{AnalyticsReport, AnalyticsService};
pub use finance::{bucket_finances, FinancePoint};
pub use range::{day_buckets, DateRange, TimeRange};
pub use store::RecordStore;
pub use summary::{summarize, SummaryStatistics};
pub use trend::{
    bucket_samples, AggregationMode, Domain, DomainRecords, Sample, TrendPoint, TrendSeries,
    AGGREGATION_RULES,
};
