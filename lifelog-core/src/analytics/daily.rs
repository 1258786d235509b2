//! Single-day totals for the home screen.

use super::calendar::CalendarZone;
use super::engine::FetchedRecords;
use super::finance::bucket_finances;
use super::trend::{bucket_samples, Domain, TrendSeries};
use chrono::NaiveDate;
use serde::Serialize;

/// What happened on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    /// `None` when no mood was logged
    pub mood_average: Option<f64>,
    pub mood_count: usize,
    pub total_calories: f64,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_amount: f64,
    pub steps: f64,
}

impl DailySummary {
    pub(crate) fn from_records(
        date: NaiveDate,
        records: &FetchedRecords,
        zone: &CalendarZone,
    ) -> Self {
        let day = [date];

        let mood_samples: Vec<_> = records
            .mood
            .samples()
            .into_iter()
            .filter(|s| zone.date_of(s.at) == date)
            .collect();
        let mood = bucket_samples(Domain::Mood, &mood_samples, &day, zone);
        let calories = bucket_samples(Domain::Nutrition, &records.nutrition.samples(), &day, zone);
        let steps = bucket_samples(Domain::HealthSteps, &records.health.samples(), &day, zone);
        let finance = bucket_finances(records.finance.financial_entries(), &day, zone);

        let first = |series: &TrendSeries| series.points.first().and_then(|p| p.value);
        let (total_income, total_expenses, net_amount) = finance
            .first()
            .map(|p| (p.total_income, p.total_expenses, p.net_amount))
            .unwrap_or_default();

        Self {
            date,
            mood_average: first(&mood),
            mood_count: mood_samples.len(),
            total_calories: first(&calories).unwrap_or(0.0),
            total_income,
            total_expenses,
            net_amount,
            steps: first(&steps).unwrap_or(0.0),
        }
    }
}
