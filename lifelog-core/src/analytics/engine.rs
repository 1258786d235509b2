//! Analytics aggregator
//!
//! Turns a [`TimeRange`] into a complete analytics report:
//!
//! ```text
//!  TimeRange ──resolve──▶ DateRange ──bounds──▶ [start, end] UTC
//!                                                   │
//!        ┌────────────┬────────────┬────────────────┤  (concurrent)
//!        ▼            ▼            ▼                ▼
//!      mood       nutrition     finance          health
//!        │            │            │                │
//!   bucket(avg)  bucket(sum)  bucket(net)     bucket(sum, steps)
//!        └────────────┴─────┬──────┴────────────────┘
//!                           ▼
//!                       summarize ──▶ AnalyticsReport
//! ```
//!
//! A domain whose fetch fails is treated as having no records in range. The
//! report still covers every day, and the failed domain is listed in
//! [`AnalyticsReport::unavailable`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lifelog_core::analytics::{AnalyticsService, CalendarZone, TimeRange};
//! use lifelog_core::{Config, Database};
//!
//! let db = Database::open(&Config::database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let service = AnalyticsService::new(Arc::new(db), CalendarZone::Local);
//! let report = service
//!     .compute_analytics_blocking(TimeRange::Week)
//!     .expect("failed to start runtime");
//! println!("average mood: {:?}", report.summary.avg_mood);
//! ```

use super::calendar::CalendarZone;
use super::daily::DailySummary;
use super::finance::{bucket_finances, FinancePoint};
use super::range::{DateRange, TimeRange};
use super::store::RecordStore;
use super::summary::{summarize, SummaryStatistics};
use super::trend::{bucket_samples, Domain, DomainRecords, TrendSeries};
use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinError;

/// Everything the analytics screen shows for one range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub time_range: TimeRange,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub summary: SummaryStatistics,
    pub mood_trend: TrendSeries,
    pub nutrition_trend: TrendSeries,
    pub finance_trend: Vec<FinancePoint>,
    pub health_trend: TrendSeries,
    /// Domains whose records could not be read; their trends are empty-valued
    pub unavailable: Vec<Domain>,
}

impl AnalyticsReport {
    /// Whether every domain was read successfully.
    pub fn is_complete(&self) -> bool {
        self.unavailable.is_empty()
    }
}

/// Records for all four domains over one range.
#[derive(Debug)]
pub(crate) struct FetchedRecords {
    pub mood: DomainRecords,
    pub nutrition: DomainRecords,
    pub finance: DomainRecords,
    pub health: DomainRecords,
    pub unavailable: Vec<Domain>,
}

/// Computes analytics over an injected record store.
///
/// Holds no state between calls; every report is computed from scratch.
#[derive(Clone)]
pub struct AnalyticsService {
    store: Arc<dyn RecordStore>,
    zone: CalendarZone,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn RecordStore>, zone: CalendarZone) -> Self {
        Self { store, zone }
    }

    /// Calendar used for day boundaries.
    pub fn zone(&self) -> CalendarZone {
        self.zone
    }

    /// Compute analytics for a range ending today.
    pub async fn compute_analytics(&self, range: TimeRange) -> AnalyticsReport {
        self.compute_analytics_on(range, self.zone.today()).await
    }

    /// Compute analytics for a range ending on `today`.
    pub async fn compute_analytics_on(&self, range: TimeRange, today: NaiveDate) -> AnalyticsReport {
        let started = Instant::now();
        let dates = range.resolve(today);
        let days = dates.days();

        let fetched = self.fetch_all(dates).await;

        let mood_trend = bucket_samples(Domain::Mood, &fetched.mood.samples(), &days, &self.zone);
        let nutrition_trend = bucket_samples(
            Domain::Nutrition,
            &fetched.nutrition.samples(),
            &days,
            &self.zone,
        );
        let health_trend = bucket_samples(
            Domain::HealthSteps,
            &fetched.health.samples(),
            &days,
            &self.zone,
        );
        let finance_trend =
            bucket_finances(fetched.finance.financial_entries(), &days, &self.zone);

        let summary = summarize(&mood_trend, &nutrition_trend, &finance_trend, &health_trend);

        tracing::info!(
            range = %range,
            start = %dates.start(),
            end = %dates.end(),
            days = days.len(),
            unavailable = ?fetched.unavailable,
            duration_ms = started.elapsed().as_millis() as u64,
            "Computed analytics"
        );

        AnalyticsReport {
            time_range: range,
            start_date: dates.start(),
            end_date: dates.end(),
            summary,
            mood_trend,
            nutrition_trend,
            finance_trend,
            health_trend,
            unavailable: fetched.unavailable,
        }
    }

    /// Blocking wrapper around [`compute_analytics`](Self::compute_analytics)
    /// for callers without a runtime.
    ///
    /// Only fails if the runtime itself cannot be started.
    pub fn compute_analytics_blocking(&self, range: TimeRange) -> Result<AnalyticsReport> {
        Ok(runtime()?.block_on(self.compute_analytics(range)))
    }

    /// Totals for a single calendar day.
    pub async fn daily_summary(&self, date: NaiveDate) -> DailySummary {
        let fetched = self.fetch_all(DateRange::day(date)).await;
        DailySummary::from_records(date, &fetched, &self.zone)
    }

    /// Blocking wrapper around [`daily_summary`](Self::daily_summary).
    pub fn daily_summary_blocking(&self, date: NaiveDate) -> Result<DailySummary> {
        Ok(runtime()?.block_on(self.daily_summary(date)))
    }

    /// Issue all four domain reads concurrently and wait for every one.
    ///
    /// Failures are contained per domain.
    pub(crate) async fn fetch_all(&self, dates: DateRange) -> FetchedRecords {
        let (start, end) = self.zone.bounds(dates.start(), dates.end());

        let [mood, nutrition, finance, health] = Domain::ALL.map(|domain| {
            let store = Arc::clone(&self.store);
            tokio::task::spawn_blocking(move || store.fetch(domain, start, end))
        });
        let (mood, nutrition, finance, health) = tokio::join!(mood, nutrition, finance, health);

        let mut unavailable = Vec::new();
        FetchedRecords {
            mood: settle(Domain::Mood, mood, &mut unavailable),
            nutrition: settle(Domain::Nutrition, nutrition, &mut unavailable),
            finance: settle(Domain::Finance, finance, &mut unavailable),
            health: settle(Domain::HealthSteps, health, &mut unavailable),
            unavailable,
        }
    }
}

fn settle(
    domain: Domain,
    joined: std::result::Result<Result<DomainRecords>, JoinError>,
    unavailable: &mut Vec<Domain>,
) -> DomainRecords {
    match joined {
        Ok(Ok(records)) if records.domain() == domain => {
            tracing::debug!(domain = %domain, records = records.len(), "Fetched records");
            return records;
        }
        Ok(Ok(records)) => {
            tracing::warn!(
                domain = %domain,
                returned = %records.domain(),
                "Store returned records for the wrong domain; treating domain as empty"
            );
        }
        Ok(Err(e)) => {
            tracing::warn!(domain = %domain, error = %e, "Fetch failed; treating domain as empty");
        }
        Err(e) => {
            tracing::warn!(domain = %domain, error = %e, "Fetch task aborted; treating domain as empty");
        }
    }
    unavailable.push(domain);
    DomainRecords::empty(domain)
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
