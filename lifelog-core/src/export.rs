//! CSV export of raw records.
//!
//! Output is one file with a section per record collection:
//!
//! ```text
//! MOOD DATA
//! Date,Time,Mood Level,Notes
//! 2024-05-01,08:15:00,7,"slept well"
//!
//! FINANCIAL DATA
//! Date,Time,Type,Amount,Description,Category
//! ...
//! ```
//!
//! Sections without records are left out entirely.

use crate::analytics::{CalendarZone, DateRange, Domain, DomainRecords, RecordStore, TimeRange};
use crate::error::Result;
use crate::types::{FinancialEntry, HealthSample, MoodEntry, NutritionEntry};
use chrono::{DateTime, NaiveDate, Utc};
use std::io::Write;

/// Which collections go into an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSelection {
    pub mood: bool,
    pub nutrition: bool,
    pub finance: bool,
    /// Every health metric, steps and sleep alike.
    pub health: bool,
}

impl Default for ExportSelection {
    fn default() -> Self {
        Self {
            mood: true,
            nutrition: true,
            finance: true,
            health: true,
        }
    }
}

impl ExportSelection {
    /// Select only the given domains.
    ///
    /// [`Domain::HealthSteps`] selects the whole health collection, since
    /// export writes raw samples of every metric.
    pub fn only(domains: &[Domain]) -> Self {
        Self {
            mood: domains.contains(&Domain::Mood),
            nutrition: domains.contains(&Domain::Nutrition),
            finance: domains.contains(&Domain::Finance),
            health: domains.contains(&Domain::HealthSteps),
        }
    }

    pub fn includes(&self, domain: Domain) -> bool {
        match domain {
            Domain::Mood => self.mood,
            Domain::Nutrition => self.nutrition,
            Domain::Finance => self.finance,
            Domain::HealthSteps => self.health,
        }
    }
}

/// Records gathered for an export, oldest first within each collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportData {
    pub mood: Vec<MoodEntry>,
    pub nutrition: Vec<NutritionEntry>,
    pub finance: Vec<FinancialEntry>,
    /// Every health metric, not only steps
    pub health: Vec<HealthSample>,
}

impl ExportData {
    /// Read the selected collections for `range`.
    ///
    /// Unlike analytics, a failed read aborts the export.
    pub fn collect(
        store: &dyn RecordStore,
        range: DateRange,
        selection: ExportSelection,
        zone: &CalendarZone,
    ) -> Result<Self> {
        let (start, end) = zone.bounds(range.start(), range.end());
        let mut data = ExportData::default();

        for domain in Domain::ALL {
            if !selection.includes(domain) {
                continue;
            }
            match store.fetch(domain, start, end)? {
                DomainRecords::Mood(mut v) => {
                    v.sort_by_key(|e| e.created_at);
                    data.mood = v;
                }
                DomainRecords::Nutrition(mut v) => {
                    v.sort_by_key(|e| e.created_at);
                    data.nutrition = v;
                }
                DomainRecords::Finance(mut v) => {
                    v.sort_by_key(|e| e.created_at);
                    data.finance = v;
                }
                DomainRecords::Health(mut v) => {
                    v.sort_by_key(|s| s.recorded_at);
                    data.health = v;
                }
            }
        }

        tracing::debug!(
            start = %range.start(),
            end = %range.end(),
            records = data.len(),
            "Collected export data"
        );
        Ok(data)
    }

    pub fn len(&self) -> usize {
        self.mood.len() + self.nutrition.len() + self.finance.len() + self.health.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Default file name for an export made on `today`.
pub fn export_file_name(range: TimeRange, today: NaiveDate) -> String {
    format!("lifelog_export_{}_{}.csv", range, today)
}

/// Write `data` as sectioned CSV, rendering timestamps in `zone`.
pub fn write_csv<W: Write>(writer: &mut W, data: &ExportData, zone: &CalendarZone) -> Result<()> {
    let mut sections: Vec<(&str, &str, Vec<String>)> = Vec::new();

    if !data.mood.is_empty() {
        let rows = data
            .mood
            .iter()
            .map(|e| {
                format!(
                    "{},{},{}",
                    date_time(e.created_at, zone),
                    e.mood_level,
                    quote(&e.notes)
                )
            })
            .collect();
        sections.push(("MOOD DATA", "Date,Time,Mood Level,Notes", rows));
    }

    if !data.nutrition.is_empty() {
        let rows = data
            .nutrition
            .iter()
            .map(|e| {
                format!(
                    "{},{},{},{},{},{},{},{}",
                    date_time(e.created_at, zone),
                    e.meal_type.as_str(),
                    quote(&e.food_name),
                    e.calories,
                    e.protein,
                    e.fat,
                    e.carbs,
                    quote(&e.serving_size)
                )
            })
            .collect();
        sections.push((
            "NUTRITION DATA",
            "Date,Time,Meal Type,Food Name,Calories,Protein,Fat,Carbs,Serving Size",
            rows,
        ));
    }

    if !data.finance.is_empty() {
        let rows = data
            .finance
            .iter()
            .map(|e| {
                format!(
                    "{},{},{},{},{}",
                    date_time(e.created_at, zone),
                    e.kind.as_str(),
                    e.amount,
                    quote(&e.description),
                    quote(&e.category)
                )
            })
            .collect();
        sections.push((
            "FINANCIAL DATA",
            "Date,Time,Type,Amount,Description,Category",
            rows,
        ));
    }

    if !data.health.is_empty() {
        let rows = data
            .health
            .iter()
            .map(|s| {
                format!(
                    "{},{},{},{},{}",
                    date_time(s.recorded_at, zone),
                    s.metric.as_str(),
                    s.value,
                    quote(&s.unit),
                    quote(&s.source)
                )
            })
            .collect();
        sections.push((
            "HEALTH DATA",
            "Date,Time,Data Type,Value,Unit,Source",
            rows,
        ));
    }

    for (i, (title, header, rows)) in sections.iter().enumerate() {
        if i > 0 {
            writeln!(writer)?;
        }
        writeln!(writer, "{}", title)?;
        writeln!(writer, "{}", header)?;
        for row in rows {
            writeln!(writer, "{}", row)?;
        }
    }

    writer.flush()?;
    Ok(())
}

fn date_time(ts: DateTime<Utc>, zone: &CalendarZone) -> String {
    zone.local_time(ts).format("%Y-%m-%d,%H:%M:%S").to_string()
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
