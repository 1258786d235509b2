//! Core domain types for lifelog
//!
//! These are the records a person logs through the day. Each collection is
//! independent of the others and carries its own timestamp column:
//!
//! | Collection | Timestamp | Notes |
//! |------------|-----------|-------|
//! | **Mood** | `created_at` | Level 1-10, many per day |
//! | **Nutrition** | `created_at` | One per food item |
//! | **Financial** | `created_at` | Income or expense |
//! | **Health** | `recorded_at` | One sample per metric per day |
//!
//! The `New*` structs are what callers hand to the store; the store assigns
//! ids and fills in timestamps that were left unset.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest and highest mood level a person can log.
pub const MOOD_LEVEL_RANGE: std::ops::RangeInclusive<i64> = 1..=10;

// ============================================
// Mood
// ============================================

/// A single mood check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: String,
    /// Level on a 1-10 scale
    pub mood_level: i64,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Mood check-in to be stored.
#[derive(Debug, Clone, Default)]
pub struct NewMoodEntry {
    pub mood_level: i64,
    pub notes: String,
    /// Defaults to now
    pub created_at: Option<DateTime<Utc>>,
}

impl NewMoodEntry {
    pub fn validate(&self) -> Result<()> {
        if !MOOD_LEVEL_RANGE.contains(&self.mood_level) {
            return Err(Error::Validation(format!(
                "mood level must be between {} and {}, got {}",
                MOOD_LEVEL_RANGE.start(),
                MOOD_LEVEL_RANGE.end(),
                self.mood_level
            )));
        }
        Ok(())
    }
}

// ============================================
// Nutrition
// ============================================

/// Meal a food item was eaten with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl std::str::FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            _ => Err(format!("unknown meal type: {}", s)),
        }
    }
}

/// One logged food item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionEntry {
    pub id: String,
    pub meal_type: MealType,
    pub food_name: String,
    pub calories: f64,
    /// Grams
    pub protein: f64,
    /// Grams
    pub fat: f64,
    /// Grams
    pub carbs: f64,
    pub serving_size: String,
    pub created_at: DateTime<Utc>,
}

/// Food item to be stored.
#[derive(Debug, Clone)]
pub struct NewNutritionEntry {
    pub meal_type: MealType,
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub serving_size: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewNutritionEntry {
    pub fn validate(&self) -> Result<()> {
        if self.food_name.trim().is_empty() {
            return Err(Error::Validation("food name must not be empty".to_string()));
        }
        for (field, value) in [
            ("calories", self.calories),
            ("protein", self.protein),
            ("fat", self.fat),
            ("carbs", self.carbs),
        ] {
            non_negative(field, value)?;
        }
        Ok(())
    }
}

// ============================================
// Finance
// ============================================

/// Direction of money flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "income" => Ok(EntryKind::Income),
            "expense" => Ok(EntryKind::Expense),
            _ => Err(format!("unknown entry kind: {}", s)),
        }
    }
}

/// A single income or expense transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialEntry {
    pub id: String,
    pub kind: EntryKind,
    /// Always non-negative; `kind` carries the sign
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Transaction to be stored.
#[derive(Debug, Clone)]
pub struct NewFinancialEntry {
    pub kind: EntryKind,
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewFinancialEntry {
    pub fn validate(&self) -> Result<()> {
        non_negative("amount", self.amount)
    }
}

/// User-defined label for transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialCategory {
    pub id: String,
    pub name: String,
    pub kind: EntryKind,
    /// Display color, e.g. `#4caf50`
    pub color: String,
    pub created_at: DateTime<Utc>,
}

// ============================================
// Health
// ============================================

/// Health metric imported from the platform health store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthMetric {
    Steps,
    Sleep,
    Weight,
    CaloriesBurned,
}

impl HealthMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthMetric::Steps => "steps",
            HealthMetric::Sleep => "sleep",
            HealthMetric::Weight => "weight",
            HealthMetric::CaloriesBurned => "calories_burned",
        }
    }

    /// Unit the metric is recorded in.
    pub fn default_unit(&self) -> &'static str {
        match self {
            HealthMetric::Steps => "count",
            HealthMetric::Sleep => "hours",
            HealthMetric::Weight => "kg",
            HealthMetric::CaloriesBurned => "kcal",
        }
    }
}

impl std::str::FromStr for HealthMetric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "steps" => Ok(HealthMetric::Steps),
            "sleep" => Ok(HealthMetric::Sleep),
            "weight" => Ok(HealthMetric::Weight),
            "calories_burned" => Ok(HealthMetric::CaloriesBurned),
            _ => Err(format!("unknown health metric: {}", s)),
        }
    }
}

/// A daily health reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSample {
    pub id: String,
    pub metric: HealthMetric,
    pub value: f64,
    pub unit: String,
    /// Where the reading came from (e.g. "healthkit", "manual")
    pub source: String,
    pub recorded_at: DateTime<Utc>,
}

/// Health reading to be stored.
#[derive(Debug, Clone)]
pub struct NewHealthSample {
    pub metric: HealthMetric,
    pub value: f64,
    /// Defaults to the metric's unit
    pub unit: Option<String>,
    pub source: String,
    pub recorded_at: Option<DateTime<Utc>>,
}

impl NewHealthSample {
    pub fn validate(&self) -> Result<()> {
        if !self.value.is_finite() {
            return Err(Error::Validation(format!(
                "{} value must be a finite number",
                self.metric.as_str()
            )));
        }
        Ok(())
    }
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Validation(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_level_bounds() {
        for level in [1, 5, 10] {
            let entry = NewMoodEntry {
                mood_level: level,
                ..Default::default()
            };
            assert!(entry.validate().is_ok(), "level {} should be valid", level);
        }
        for level in [0, 11, -3] {
            let entry = NewMoodEntry {
                mood_level: level,
                ..Default::default()
            };
            assert!(entry.validate().is_err(), "level {} should be rejected", level);
        }
    }

    #[test]
    fn test_negative_amount_rejected() {
        let entry = NewFinancialEntry {
            kind: EntryKind::Expense,
            amount: -5.0,
            description: "refund?".to_string(),
            category: "misc".to_string(),
            created_at: None,
        };
        let err = entry.validate().unwrap_err();
        assert!(err.to_string().contains("amount"));
    }

    #[test]
    fn test_nutrition_validation() {
        let mut entry = NewNutritionEntry {
            meal_type: MealType::Lunch,
            food_name: "Salad".to_string(),
            calories: 0.0,
            protein: 3.0,
            fat: 1.0,
            carbs: 8.0,
            serving_size: "1 bowl".to_string(),
            created_at: None,
        };
        assert!(entry.validate().is_ok());

        entry.carbs = f64::NAN;
        assert!(entry.validate().is_err());

        entry.carbs = 8.0;
        entry.food_name = "  ".to_string();
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_enum_round_trip_strings() {
        for metric in [
            HealthMetric::Steps,
            HealthMetric::Sleep,
            HealthMetric::Weight,
            HealthMetric::CaloriesBurned,
        ] {
            assert_eq!(metric.as_str().parse::<HealthMetric>().unwrap(), metric);
        }
        assert_eq!("snack".parse::<MealType>().unwrap(), MealType::Snack);
        assert!("brunch".parse::<MealType>().is_err());
        assert_eq!("income".parse::<EntryKind>().unwrap(), EntryKind::Income);
    }
}
