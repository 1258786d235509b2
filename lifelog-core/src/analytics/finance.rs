//! Daily income, expenses, and net amount.

use super::calendar::CalendarZone;
use super::trend::group_by_day;
use crate::types::{EntryKind, FinancialEntry};
use chrono::NaiveDate;
use serde::Serialize;

/// Money in and out for a single day. Never absent: a day without
/// transactions nets to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinancePoint {
    pub date: NaiveDate,
    pub total_income: f64,
    pub total_expenses: f64,
    /// `total_income - total_expenses`
    pub net_amount: f64,
}

impl FinancePoint {
    fn new(date: NaiveDate, total_income: f64, total_expenses: f64) -> Self {
        Self {
            date,
            total_income,
            total_expenses,
            net_amount: total_income - total_expenses,
        }
    }
}

/// Fold transactions into one point per day in `days`, in the same order.
pub fn bucket_finances(
    entries: &[FinancialEntry],
    days: &[NaiveDate],
    zone: &CalendarZone,
) -> Vec<FinancePoint> {
    let grouped = group_by_day(
        entries.iter().map(|e| (e.created_at, (e.kind, e.amount))),
        zone,
    );

    days.iter()
        .map(|date| {
            let (income, expenses) = grouped
                .get(date)
                .map(|day| {
                    day.iter().fold((0.0, 0.0), |(inc, exp), (kind, amount)| match kind {
                        EntryKind::Income => (inc + amount, exp),
                        EntryKind::Expense => (inc, exp + amount),
                    })
                })
                .unwrap_or((0.0, 0.0));
            FinancePoint::new(*date, income, expenses)
        })
        .collect()
}
