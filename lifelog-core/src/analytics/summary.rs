//! Headline statistics across a whole range.

use super::finance::FinancePoint;
use super::trend::TrendSeries;
use serde::Serialize;

/// Range-wide figures shown above the charts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SummaryStatistics {
    /// Mean of daily mood averages; `None` when no day had a mood above 0
    pub avg_mood: Option<f64>,
    /// Mean calories over days with calories above 0
    pub avg_calories: Option<f64>,
    pub total_income: f64,
    pub total_expenses: f64,
    /// Mean steps over days with steps above 0
    pub avg_steps: Option<f64>,
    /// No sleep series feeds analytics yet; always `None`
    pub avg_sleep: Option<f64>,
}

impl SummaryStatistics {
    /// `total_income - total_expenses`
    pub fn net_amount(&self) -> f64 {
        self.total_income - self.total_expenses
    }
}

/// Reduce the four daily series to summary statistics.
///
/// Averages run over days, not samples, so a day with many mood check-ins
/// counts once. Days with a value of exactly 0 are left out of the averages
/// along with absent days.
pub fn summarize(
    mood: &TrendSeries,
    nutrition: &TrendSeries,
    finance: &[FinancePoint],
    health_steps: &TrendSeries,
) -> SummaryStatistics {
    SummaryStatistics {
        avg_mood: positive_mean(mood),
        avg_calories: positive_mean(nutrition),
        total_income: finance.iter().map(|p| p.total_income).sum(),
        total_expenses: finance.iter().map(|p| p.total_expenses).sum(),
        avg_steps: positive_mean(health_steps),
        avg_sleep: None,
    }
}

fn positive_mean(series: &TrendSeries) -> Option<f64> {
    let (sum, count) = series
        .present_values()
        .filter(|v| *v > 0.0)
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::trend::{Domain, TrendPoint};
    use chrono::NaiveDate;

    fn series(domain: Domain, values: &[Option<f64>]) -> TrendSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        TrendSeries {
            domain,
            points: start
                .iter_days()
                .zip(values)
                .map(|(date, value)| TrendPoint {
                    date,
                    value: *value,
                })
                .collect(),
        }
    }

    fn finance(days: &[(f64, f64)]) -> Vec<FinancePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        start
            .iter_days()
            .zip(days)
            .map(|(date, (income, expenses))| FinancePoint {
                date,
                total_income: *income,
                total_expenses: *expenses,
                net_amount: income - expenses,
            })
            .collect()
    }

    #[test]
    fn test_mood_average_counts_days_not_samples() {
        // Day 1 had 8 and 4 (mean 6), day 3 had 6
        let mood = series(Domain::Mood, &[Some(6.0), None, Some(6.0), None]);
        let empty = series(Domain::Nutrition, &[Some(0.0); 4]);
        let steps = series(Domain::HealthSteps, &[Some(0.0); 4]);

        let summary = summarize(&mood, &empty, &finance(&[(0.0, 0.0); 4]), &steps);

        assert_eq!(summary.avg_mood, Some(6.0));
        assert_eq!(summary.avg_calories, None);
        assert_eq!(summary.avg_steps, None);
    }

    #[test]
    fn test_zero_days_excluded_from_averages() {
        let mood = series(Domain::Mood, &[None; 3]);
        let calories = series(Domain::Nutrition, &[Some(2000.0), Some(0.0), Some(1000.0)]);
        let steps = series(Domain::HealthSteps, &[Some(0.0), Some(12000.0), Some(0.0)]);

        let summary = summarize(&mood, &calories, &finance(&[(0.0, 0.0); 3]), &steps);

        assert_eq!(summary.avg_calories, Some(1500.0));
        assert_eq!(summary.avg_steps, Some(12000.0));
        assert_eq!(summary.avg_mood, None);
    }

    #[test]
    fn test_financial_totals_always_defined() {
        let none = series(Domain::Mood, &[None; 2]);
        let zeros = series(Domain::Nutrition, &[Some(0.0); 2]);

        let summary = summarize(&none, &zeros, &finance(&[(100.0, 30.0), (0.0, 20.0)]), &zeros);
        assert_eq!(summary.total_income, 100.0);
        assert_eq!(summary.total_expenses, 50.0);
        assert_eq!(summary.net_amount(), 50.0);

        let empty = summarize(&none, &zeros, &[], &zeros);
        assert_eq!(empty.total_income, 0.0);
        assert_eq!(empty.total_expenses, 0.0);
        assert_eq!(empty.avg_sleep, None);
    }
}
