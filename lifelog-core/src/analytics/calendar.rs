//! Calendar used to turn instants into whole days.
//!
//! Records are stored as UTC instants, but "which day was this" depends on
//! where the person lives. [`CalendarZone`] answers that question and the
//! inverse one: which UTC instants cover a given calendar day.

use chrono::{
    DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};

/// Calendar a day boundary is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarZone {
    /// The machine's local timezone, DST included
    #[default]
    Local,
    Utc,
    /// A fixed offset from UTC
    Fixed(FixedOffset),
}

impl CalendarZone {
    /// Wall-clock reading of an instant in this calendar.
    pub fn local_time(&self, ts: DateTime<Utc>) -> NaiveDateTime {
        match self {
            CalendarZone::Local => ts.with_timezone(&Local).naive_local(),
            CalendarZone::Utc => ts.naive_utc(),
            CalendarZone::Fixed(offset) => ts.with_timezone(offset).naive_local(),
        }
    }

    /// Calendar day an instant falls on.
    pub fn date_of(&self, ts: DateTime<Utc>) -> NaiveDate {
        self.local_time(ts).date()
    }

    /// Today's date in this calendar.
    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now())
    }

    /// First instant of `date`.
    ///
    /// When local midnight does not exist (a DST gap), falls back to midnight
    /// UTC so a range query still has a usable bound.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date.and_time(NaiveTime::MIN);
        let resolved = match self {
            CalendarZone::Local => Local
                .from_local_datetime(&midnight)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            CalendarZone::Utc => Some(midnight.and_utc()),
            CalendarZone::Fixed(offset) => offset
                .from_local_datetime(&midnight)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        };
        resolved.unwrap_or_else(|| midnight.and_utc())
    }

    /// Last instant of `date` at millisecond precision (inclusive bound).
    pub fn end_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        match date.succ_opt() {
            Some(next) => self.start_of_day(next) - Duration::milliseconds(1),
            None => DateTime::<Utc>::MAX_UTC,
        }
    }

    /// Inclusive UTC bounds covering every instant from the start of `start`
    /// to the end of `end`.
    pub fn bounds(&self, start: NaiveDate, end: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start_of_day(start), self.end_of_day(end))
    }
}

impl std::str::FromStr for CalendarZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(CalendarZone::Local),
            "utc" | "z" => Ok(CalendarZone::Utc),
            other => other
                .parse::<FixedOffset>()
                .map(CalendarZone::Fixed)
                .map_err(|_| {
                    format!(
                        "unknown timezone '{}' (expected local, utc, or an offset like +05:30)",
                        s
                    )
                }),
        }
    }
}
