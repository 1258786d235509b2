//! Per-domain daily trend series.
//!
//! Each domain folds its samples into one value per calendar day. How a day
//! is folded is looked up from [`AGGREGATION_RULES`] rather than decided at
//! each call site.
//!
//! | Domain | Mode | Empty day |
//! |--------|------|-----------|
//! | Mood | Average | absent |
//! | Nutrition (calories) | Sum | 0 |
//! | Finance | Net | income 0, expenses 0 |
//! | Health (steps) | Sum | 0 |

use super::calendar::CalendarZone;
use crate::types::{
    FinancialEntry, HealthMetric, HealthSample, MoodEntry, NutritionEntry,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// One of the four record collections feeding analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Mood,
    Nutrition,
    Finance,
    HealthSteps,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Mood,
        Domain::Nutrition,
        Domain::Finance,
        Domain::HealthSteps,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Mood => "mood",
            Domain::Nutrition => "nutrition",
            Domain::Finance => "finance",
            Domain::HealthSteps => "health_steps",
        }
    }

    /// How this domain folds a day's samples.
    pub fn mode(&self) -> AggregationMode {
        AGGREGATION_RULES
            .iter()
            .find(|(domain, _)| domain == self)
            .map(|(_, mode)| *mode)
            .unwrap_or(AggregationMode::Sum)
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a day's samples become a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// Mean of the day's values; a day without samples is absent
    Average,
    /// Total of the day's values; a day without samples is 0
    Sum,
    /// Income and expenses summed separately, then netted
    Net,
}

/// Aggregation mode per domain.
pub const AGGREGATION_RULES: &[(Domain, AggregationMode)] = &[
    (Domain::Mood, AggregationMode::Average),
    (Domain::Nutrition, AggregationMode::Sum),
    (Domain::Finance, AggregationMode::Net),
    (Domain::HealthSteps, AggregationMode::Sum),
];

/// Records of a single domain as returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainRecords {
    Mood(Vec<MoodEntry>),
    Nutrition(Vec<NutritionEntry>),
    Finance(Vec<FinancialEntry>),
    /// Every health metric in range; only steps feed the trend
    Health(Vec<HealthSample>),
}

impl DomainRecords {
    /// Records standing in for a domain whose fetch failed.
    pub fn empty(domain: Domain) -> Self {
        match domain {
            Domain::Mood => DomainRecords::Mood(Vec::new()),
            Domain::Nutrition => DomainRecords::Nutrition(Vec::new()),
            Domain::Finance => DomainRecords::Finance(Vec::new()),
            Domain::HealthSteps => DomainRecords::Health(Vec::new()),
        }
    }

    pub fn domain(&self) -> Domain {
        match self {
            DomainRecords::Mood(_) => Domain::Mood,
            DomainRecords::Nutrition(_) => Domain::Nutrition,
            DomainRecords::Finance(_) => Domain::Finance,
            DomainRecords::Health(_) => Domain::HealthSteps,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DomainRecords::Mood(v) => v.len(),
            DomainRecords::Nutrition(v) => v.len(),
            DomainRecords::Finance(v) => v.len(),
            DomainRecords::Health(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Transactions, or an empty slice for non-finance records.
    pub fn financial_entries(&self) -> &[FinancialEntry] {
        match self {
            DomainRecords::Finance(entries) => entries,
            _ => &[],
        }
    }

    /// Scalar (timestamp, value) samples for single-valued domains.
    ///
    /// Finance has two values per record and yields nothing here; see
    /// [`super::finance`].
    pub fn samples(&self) -> Vec<Sample> {
        match self {
            DomainRecords::Mood(entries) => entries
                .iter()
                .map(|e| Sample::new(e.created_at, e.mood_level as f64))
                .collect(),
            DomainRecords::Nutrition(entries) => entries
                .iter()
                .map(|e| Sample::new(e.created_at, e.calories))
                .collect(),
            DomainRecords::Health(samples) => samples
                .iter()
                .filter(|s| s.metric == HealthMetric::Steps)
                .map(|s| Sample::new(s.recorded_at, s.value))
                .collect(),
            DomainRecords::Finance(_) => Vec::new(),
        }
    }
}

/// A timestamped scalar reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub at: DateTime<Utc>,
    pub value: f64,
}

impl Sample {
    pub fn new(at: DateTime<Utc>, value: f64) -> Self {
        Self { at, value }
    }
}

/// One day of a trend. `value` is `None` only for averaged domains on days
/// without samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Gap-free daily series for one domain, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub domain: Domain,
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    /// Values of days that have one.
    pub fn present_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|p| p.value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Group samples by the calendar day they fall on.
pub(crate) fn group_by_day<T: Copy>(
    items: impl IntoIterator<Item = (DateTime<Utc>, T)>,
    zone: &CalendarZone,
) -> BTreeMap<NaiveDate, Vec<T>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<T>> = BTreeMap::new();
    for (at, item) in items {
        grouped.entry(zone.date_of(at)).or_default().push(item);
    }
    grouped
}

/// Fold scalar samples into one point per day in `days`.
///
/// Samples falling outside `days` are ignored. Output has exactly
/// `days.len()` points in the same order.
///
/// Only for single-valued domains. Finance carries income and expenses per
/// record and goes through [`bucket_finances`](super::finance::bucket_finances).
pub fn bucket_samples(
    domain: Domain,
    samples: &[Sample],
    days: &[NaiveDate],
    zone: &CalendarZone,
) -> TrendSeries {
    let mode = domain.mode();
    debug_assert!(
        mode != AggregationMode::Net,
        "{} must be bucketed with bucket_finances",
        domain
    );
    let grouped = group_by_day(samples.iter().map(|s| (s.at, s.value)), zone);

    let points = days
        .iter()
        .map(|date| {
            let values = grouped.get(date).map(Vec::as_slice).unwrap_or(&[]);
            TrendPoint {
                date: *date,
                value: fold_day(mode, values),
            }
        })
        .collect();

    TrendSeries { domain, points }
}

fn fold_day(mode: AggregationMode, values: &[f64]) -> Option<f64> {
    let total: f64 = values.iter().sum();
    match mode {
        AggregationMode::Average if values.is_empty() => None,
        AggregationMode::Average => Some(total / values.len() as f64),
        AggregationMode::Sum => Some(total),
        // Scalar samples carry no income/expense split
        AggregationMode::Net => None,
    }
}
