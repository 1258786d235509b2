//! Analytics windows and the calendar days they cover.

use crate::error::{Error, Result};
use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Window the person picked for their trends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    Week,
    Month,
    Year,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::Year => "year",
        }
    }

    /// Resolve to concrete dates ending on `today`.
    ///
    /// Week and month step back a fixed 7 and 30 days. Year steps back one
    /// calendar year, so the span grows by a day when it contains Feb 29.
    /// Feb 29 itself maps to Feb 28 of the previous year.
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        let start = match self {
            TimeRange::Week => today.checked_sub_signed(Duration::days(7)),
            TimeRange::Month => today.checked_sub_signed(Duration::days(30)),
            TimeRange::Year => today.checked_sub_months(Months::new(12)),
        }
        .unwrap_or(NaiveDate::MIN);

        DateRange { start, end: today }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "year" => Ok(TimeRange::Year),
            _ => Err(format!("unknown time range: {} (expected week, month or year)", s)),
        }
    }
}

/// Inclusive span of calendar days. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Single-day range.
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn len_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Every day in the range, ascending.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start.iter_days().take(self.len_days()).collect()
    }
}

/// One entry per calendar day from `start` to `end`, ascending, inclusive.
///
/// Fails with [`Error::InvalidRange`] when `start` is after `end`.
pub fn day_buckets(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>> {
    DateRange::new(start, end).map(|range| range.days())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_and_month_offsets() {
        let today = date(2024, 5, 15);

        let week = TimeRange::Week.resolve(today);
        assert_eq!(week.start(), date(2024, 5, 8));
        assert_eq!(week.end(), today);
        assert_eq!(week.len_days(), 8);

        let month = TimeRange::Month.resolve(today);
        assert_eq!(month.start(), date(2024, 4, 15));
        assert_eq!(month.len_days(), 31);
    }

    #[test]
    fn test_year_crossing_leap_day() {
        let range = TimeRange::Year.resolve(date(2024, 3, 1));
        assert_eq!(range.start(), date(2023, 3, 1));
        // 2023-03-01 ..= 2024-03-01 includes 2024-02-29
        assert_eq!(range.len_days(), 367);
        assert_eq!(range.days().len(), 367);
        assert!(range.days().contains(&date(2024, 2, 29)));
    }

    #[test]
    fn test_year_without_leap_day() {
        let range = TimeRange::Year.resolve(date(2023, 3, 1));
        assert_eq!(range.start(), date(2022, 3, 1));
        assert_eq!(range.len_days(), 366);
    }

    #[test]
    fn test_year_from_leap_day_clamps() {
        let range = TimeRange::Year.resolve(date(2024, 2, 29));
        assert_eq!(range.start(), date(2023, 2, 28));
    }

    #[test]
    fn test_single_day_bucket() {
        let days = day_buckets(date(2024, 1, 1), date(2024, 1, 1)).unwrap();
        assert_eq!(days, vec![date(2024, 1, 1)]);
    }

    #[test]
    fn test_buckets_contiguous_across_month_end() {
        let days = day_buckets(date(2024, 1, 30), date(2024, 2, 2)).unwrap();
        assert_eq!(
            days,
            vec![
                date(2024, 1, 30),
                date(2024, 1, 31),
                date(2024, 2, 1),
                date(2024, 2, 2)
            ]
        );
        for pair in days.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = day_buckets(date(2024, 1, 2), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { .. }));
    }

    #[test]
    fn test_parse_time_range() {
        assert_eq!("year".parse::<TimeRange>().unwrap(), TimeRange::Year);
        assert!("fortnight".parse::<TimeRange>().is_err());
        assert_eq!(TimeRange::Month.to_string(), "month");
    }
}
