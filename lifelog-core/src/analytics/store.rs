//! Record store seam for the analytics aggregator.
//!
//! The aggregator only needs inclusive time-range reads over four
//! collections. [`Database`](crate::Database) implements this trait; tests
//! substitute in-memory fakes.

use super::trend::{Domain, DomainRecords};
use crate::error::Result;
use crate::types::{FinancialEntry, HealthSample, MoodEntry, NutritionEntry};
use chrono::{DateTime, Utc};

/// Range reads over the four record collections.
///
/// Each method returns records whose timestamp lies in `[start, end]`, both
/// ends inclusive. Order is not relied upon.
pub trait RecordStore: Send + Sync {
    fn mood_entries(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<MoodEntry>>;

    fn nutrition_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<NutritionEntry>>;

    fn financial_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FinancialEntry>>;

    fn health_samples(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HealthSample>>;

    /// Fetch one domain's records.
    fn fetch(
        &self,
        domain: Domain,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<DomainRecords> {
        Ok(match domain {
            Domain::Mood => DomainRecords::Mood(self.mood_entries(start, end)?),
            Domain::Nutrition => DomainRecords::Nutrition(self.nutrition_entries(start, end)?),
            Domain::Finance => DomainRecords::Finance(self.financial_entries(start, end)?),
            Domain::HealthSteps => DomainRecords::Health(self.health_samples(start, end)?),
        })
    }
}
