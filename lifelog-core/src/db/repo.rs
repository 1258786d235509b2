//! Database repository layer
//!
//! Provides insert, range query, and delete operations for every record
//! collection, updates for food items, transactions and categories, and
//! implements [`RecordStore`] for the analytics aggregator.

use crate::analytics::{CalendarZone, RecordStore};
use crate::error::{Error, Result};
use crate::types::*;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;

/// Row counts per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionCounts {
    pub mood: i64,
    pub nutrition: i64,
    pub financial: i64,
    pub health: i64,
}

/// Database handle with connection pooling (single connection for now)
pub struct Database {
    conn: Mutex<Connection>,
}

/// Storage form of a timestamp. Fixed width with a `Z` suffix so that string
/// order equals time order.
fn ts_to_sql(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn ts_from_row(row: &Row, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            let idx = row.as_ref().column_index(column).unwrap_or(0);
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
        })
}

fn enum_from_row<T>(row: &Row, column: &str) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    let raw: String = row.get(column)?;
    raw.parse().map_err(|e: String| {
        let idx = row.as_ref().column_index(column).unwrap_or(0);
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
        )
    })
}

fn not_found(kind: &'static str, id: &str) -> Error {
    Error::NotFound {
        kind,
        id: id.to_string(),
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA cache_size = -16000;  -- 16MB cache
            ",
        )?;

        tracing::debug!(path = %path.display(), "Opened database");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    fn delete_by_id(&self, table: &str, kind: &'static str, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute(&format!("DELETE FROM {} WHERE id = ?", table), [id])?;
        if removed == 0 {
            return Err(not_found(kind, id));
        }
        tracing::debug!(table, id, "Deleted record");
        Ok(())
    }

    /// Row counts for every collection.
    pub fn count_entries(&self) -> Result<CollectionCounts> {
        let conn = self.conn.lock().unwrap();
        let count = |table: &str| -> rusqlite::Result<i64> {
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        };
        Ok(CollectionCounts {
            mood: count("mood_entries")?,
            nutrition: count("nutrition_entries")?,
            financial: count("financial_entries")?,
            health: count("health_data")?,
        })
    }

    // ============================================
    // Mood operations
    // ============================================

    /// Store a mood check-in
    pub fn insert_mood(&self, entry: &NewMoodEntry) -> Result<MoodEntry> {
        entry.validate()?;
        let stored = MoodEntry {
            id: new_id(),
            mood_level: entry.mood_level,
            notes: entry.notes.clone(),
            created_at: entry.created_at.unwrap_or_else(Utc::now),
        };

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO mood_entries (id, mood_level, notes, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                stored.id,
                stored.mood_level,
                stored.notes,
                ts_to_sql(&stored.created_at)
            ],
        )?;

        tracing::debug!(id = %stored.id, level = stored.mood_level, "Inserted mood entry");
        Ok(stored)
    }

    /// Mood entries in `[start, end]`, oldest first
    pub fn mood_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<MoodEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM mood_entries
            WHERE created_at >= ?1 AND created_at <= ?2
            ORDER BY created_at, id
            "#,
        )?;
        let entries = stmt
            .query_map([ts_to_sql(&start), ts_to_sql(&end)], Self::row_to_mood)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Most recent mood entries, newest first
    pub fn recent_mood(&self, limit: usize) -> Result<Vec<MoodEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT * FROM mood_entries ORDER BY created_at DESC, id LIMIT ?")?;
        let entries = stmt
            .query_map([limit as i64], Self::row_to_mood)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn delete_mood(&self, id: &str) -> Result<()> {
        self.delete_by_id("mood_entries", "mood entry", id)
    }

    fn row_to_mood(row: &Row) -> rusqlite::Result<MoodEntry> {
        Ok(MoodEntry {
            id: row.get("id")?,
            mood_level: row.get("mood_level")?,
            notes: row.get("notes")?,
            created_at: ts_from_row(row, "created_at")?,
        })
    }

    // ============================================
    // Nutrition operations
    // ============================================

    /// Store a food item
    pub fn insert_nutrition(&self, entry: &NewNutritionEntry) -> Result<NutritionEntry> {
        entry.validate()?;
        let stored = NutritionEntry {
            id: new_id(),
            meal_type: entry.meal_type,
            food_name: entry.food_name.trim().to_string(),
            calories: entry.calories,
            protein: entry.protein,
            fat: entry.fat,
            carbs: entry.carbs,
            serving_size: entry.serving_size.clone(),
            created_at: entry.created_at.unwrap_or_else(Utc::now),
        };

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO nutrition_entries (id, meal_type, food_name, calories, protein, fat,
                                           carbs, serving_size, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                stored.id,
                stored.meal_type.as_str(),
                stored.food_name,
                stored.calories,
                stored.protein,
                stored.fat,
                stored.carbs,
                stored.serving_size,
                ts_to_sql(&stored.created_at),
            ],
        )?;

        tracing::debug!(id = %stored.id, calories = stored.calories, "Inserted nutrition entry");
        Ok(stored)
    }

    /// Nutrition entries in `[start, end]`, oldest first
    pub fn nutrition_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<NutritionEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM nutrition_entries
            WHERE created_at >= ?1 AND created_at <= ?2
            ORDER BY created_at, id
            "#,
        )?;
        let entries = stmt
            .query_map([ts_to_sql(&start), ts_to_sql(&end)], Self::row_to_nutrition)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Most recent food items, newest first
    pub fn recent_nutrition(&self, limit: usize) -> Result<Vec<NutritionEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT * FROM nutrition_entries ORDER BY created_at DESC, id LIMIT ?")?;
        let entries = stmt
            .query_map([limit as i64], Self::row_to_nutrition)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Replace the fields of a stored food item. Without a timestamp the
    /// stored one is kept.
    pub fn update_nutrition(&self, id: &str, entry: &NewNutritionEntry) -> Result<NutritionEntry> {
        entry.validate()?;

        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            r#"
            UPDATE nutrition_entries
            SET meal_type = ?2, food_name = ?3, calories = ?4, protein = ?5, fat = ?6,
                carbs = ?7, serving_size = ?8, created_at = COALESCE(?9, created_at)
            WHERE id = ?1
            "#,
            params![
                id,
                entry.meal_type.as_str(),
                entry.food_name.trim(),
                entry.calories,
                entry.protein,
                entry.fat,
                entry.carbs,
                entry.serving_size,
                entry.created_at.as_ref().map(ts_to_sql),
            ],
        )?;
        if changed == 0 {
            return Err(not_found("nutrition entry", id));
        }

        tracing::debug!(id, "Updated nutrition entry");
        conn.query_row(
            "SELECT * FROM nutrition_entries WHERE id = ?",
            [id],
            Self::row_to_nutrition,
        )
        .map_err(Error::from)
    }

    pub fn delete_nutrition(&self, id: &str) -> Result<()> {
        self.delete_by_id("nutrition_entries", "nutrition entry", id)
    }

    fn row_to_nutrition(row: &Row) -> rusqlite::Result<NutritionEntry> {
        Ok(NutritionEntry {
            id: row.get("id")?,
            meal_type: enum_from_row(row, "meal_type")?,
            food_name: row.get("food_name")?,
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            fat: row.get("fat")?,
            carbs: row.get("carbs")?,
            serving_size: row.get("serving_size")?,
            created_at: ts_from_row(row, "created_at")?,
        })
    }

    // ============================================
    // Financial operations
    // ============================================

    /// Store a transaction
    pub fn insert_financial(&self, entry: &NewFinancialEntry) -> Result<FinancialEntry> {
        entry.validate()?;
        let stored = FinancialEntry {
            id: new_id(),
            kind: entry.kind,
            amount: entry.amount,
            description: entry.description.clone(),
            category: entry.category.clone(),
            created_at: entry.created_at.unwrap_or_else(Utc::now),
        };

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO financial_entries (id, entry_type, amount, description, category, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                stored.id,
                stored.kind.as_str(),
                stored.amount,
                stored.description,
                stored.category,
                ts_to_sql(&stored.created_at),
            ],
        )?;

        tracing::debug!(
            id = %stored.id,
            kind = stored.kind.as_str(),
            amount = stored.amount,
            "Inserted financial entry"
        );
        Ok(stored)
    }

    /// Transactions in `[start, end]`, oldest first
    pub fn financial_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FinancialEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM financial_entries
            WHERE created_at >= ?1 AND created_at <= ?2
            ORDER BY created_at, id
            "#,
        )?;
        let entries = stmt
            .query_map([ts_to_sql(&start), ts_to_sql(&end)], Self::row_to_financial)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Most recent transactions, newest first
    pub fn recent_financial(&self, limit: usize) -> Result<Vec<FinancialEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT * FROM financial_entries ORDER BY created_at DESC, id LIMIT ?")?;
        let entries = stmt
            .query_map([limit as i64], Self::row_to_financial)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Replace the fields of a stored transaction. Without a timestamp the
    /// stored one is kept.
    pub fn update_financial(&self, id: &str, entry: &NewFinancialEntry) -> Result<FinancialEntry> {
        entry.validate()?;

        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            r#"
            UPDATE financial_entries
            SET entry_type = ?2, amount = ?3, description = ?4, category = ?5,
                created_at = COALESCE(?6, created_at)
            WHERE id = ?1
            "#,
            params![
                id,
                entry.kind.as_str(),
                entry.amount,
                entry.description,
                entry.category,
                entry.created_at.as_ref().map(ts_to_sql),
            ],
        )?;
        if changed == 0 {
            return Err(not_found("financial entry", id));
        }

        tracing::debug!(id, "Updated financial entry");
        conn.query_row(
            "SELECT * FROM financial_entries WHERE id = ?",
            [id],
            Self::row_to_financial,
        )
        .map_err(Error::from)
    }

    pub fn delete_financial(&self, id: &str) -> Result<()> {
        self.delete_by_id("financial_entries", "financial entry", id)
    }

    fn row_to_financial(row: &Row) -> rusqlite::Result<FinancialEntry> {
        Ok(FinancialEntry {
            id: row.get("id")?,
            kind: enum_from_row(row, "entry_type")?,
            amount: row.get("amount")?,
            description: row.get("description")?,
            category: row.get("category")?,
            created_at: ts_from_row(row, "created_at")?,
        })
    }

    // ============================================
    // Category operations
    // ============================================

    /// Create a transaction category. Names are unique per kind.
    pub fn create_category(
        &self,
        name: &str,
        kind: EntryKind,
        color: &str,
    ) -> Result<FinancialCategory> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation(
                "category name must not be empty".to_string(),
            ));
        }

        let category = FinancialCategory {
            id: new_id(),
            name: name.to_string(),
            kind,
            color: color.to_string(),
            created_at: Utc::now(),
        };

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO financial_categories (id, name, entry_type, color, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                category.id,
                category.name,
                category.kind.as_str(),
                category.color,
                ts_to_sql(&category.created_at),
            ],
        )?;
        Ok(category)
    }

    /// All categories ordered by name
    pub fn list_categories(&self) -> Result<Vec<FinancialCategory>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT * FROM financial_categories ORDER BY name, entry_type")?;
        let categories = stmt
            .query_map([], Self::row_to_category)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    /// Rename, recolor, or change the kind of a category.
    pub fn update_category(
        &self,
        id: &str,
        name: &str,
        kind: EntryKind,
        color: &str,
    ) -> Result<FinancialCategory> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation(
                "category name must not be empty".to_string(),
            ));
        }

        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE financial_categories SET name = ?2, entry_type = ?3, color = ?4 WHERE id = ?1",
            params![id, name, kind.as_str(), color],
        )?;
        if changed == 0 {
            return Err(not_found("category", id));
        }

        conn.query_row(
            "SELECT * FROM financial_categories WHERE id = ?",
            [id],
            Self::row_to_category,
        )
        .map_err(Error::from)
    }

    pub fn delete_category(&self, id: &str) -> Result<()> {
        self.delete_by_id("financial_categories", "category", id)
    }

    fn row_to_category(row: &Row) -> rusqlite::Result<FinancialCategory> {
        Ok(FinancialCategory {
            id: row.get("id")?,
            name: row.get("name")?,
            kind: enum_from_row(row, "entry_type")?,
            color: row.get("color")?,
            created_at: ts_from_row(row, "created_at")?,
        })
    }

    // ============================================
    // Health operations
    // ============================================

    /// Record a health reading, replacing any reading of the same metric on
    /// the same calendar day.
    pub fn record_health_sample(
        &self,
        sample: &NewHealthSample,
        zone: &CalendarZone,
    ) -> Result<HealthSample> {
        sample.validate()?;
        let recorded_at = sample.recorded_at.unwrap_or_else(Utc::now);
        let (day_start, day_end) = {
            let day = zone.date_of(recorded_at);
            zone.bounds(day, day)
        };

        let conn = self.conn.lock().unwrap();
        let existing: Option<String> = conn
            .query_row(
                r#"
                SELECT id FROM health_data
                WHERE data_type = ?1 AND recorded_at >= ?2 AND recorded_at <= ?3
                ORDER BY recorded_at DESC
                LIMIT 1
                "#,
                params![
                    sample.metric.as_str(),
                    ts_to_sql(&day_start),
                    ts_to_sql(&day_end)
                ],
                |r| r.get(0),
            )
            .optional()?;

        let stored = HealthSample {
            id: existing.clone().unwrap_or_else(new_id),
            metric: sample.metric,
            value: sample.value,
            unit: sample
                .unit
                .clone()
                .unwrap_or_else(|| sample.metric.default_unit().to_string()),
            source: sample.source.clone(),
            recorded_at,
        };

        if existing.is_some() {
            conn.execute(
                r#"
                UPDATE health_data
                SET value = ?2, unit = ?3, source = ?4, recorded_at = ?5
                WHERE id = ?1
                "#,
                params![
                    stored.id,
                    stored.value,
                    stored.unit,
                    stored.source,
                    ts_to_sql(&stored.recorded_at),
                ],
            )?;
            tracing::debug!(id = %stored.id, metric = stored.metric.as_str(), "Replaced health sample");
        } else {
            conn.execute(
                r#"
                INSERT INTO health_data (id, data_type, value, unit, source, recorded_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    stored.id,
                    stored.metric.as_str(),
                    stored.value,
                    stored.unit,
                    stored.source,
                    ts_to_sql(&stored.recorded_at),
                ],
            )?;
            tracing::debug!(id = %stored.id, metric = stored.metric.as_str(), "Inserted health sample");
        }

        Ok(stored)
    }

    /// Health samples of every metric in `[start, end]`, oldest first
    pub fn health_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HealthSample>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM health_data
            WHERE recorded_at >= ?1 AND recorded_at <= ?2
            ORDER BY recorded_at, id
            "#,
        )?;
        let samples = stmt
            .query_map([ts_to_sql(&start), ts_to_sql(&end)], Self::row_to_health)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(samples)
    }

    /// Most recent readings of one metric, newest first
    pub fn recent_health(&self, metric: HealthMetric, limit: usize) -> Result<Vec<HealthSample>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM health_data WHERE data_type = ? ORDER BY recorded_at DESC, id LIMIT ?",
        )?;
        let samples = stmt
            .query_map(
                params![metric.as_str(), limit as i64],
                Self::row_to_health,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(samples)
    }

    pub fn delete_health_sample(&self, id: &str) -> Result<()> {
        self.delete_by_id("health_data", "health sample", id)
    }

    fn row_to_health(row: &Row) -> rusqlite::Result<HealthSample> {
        Ok(HealthSample {
            id: row.get("id")?,
            metric: enum_from_row(row, "data_type")?,
            value: row.get("value")?,
            unit: row.get("unit")?,
            source: row.get("source")?,
            recorded_at: ts_from_row(row, "recorded_at")?,
        })
    }
}

impl RecordStore for Database {
    fn mood_entries(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<MoodEntry>> {
        self.mood_between(start, end)
    }

    fn nutrition_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<NutritionEntry>> {
        self.nutrition_between(start, end)
    }

    fn financial_entries(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FinancialEntry>> {
        self.financial_between(start, end)
    }

    fn health_samples(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HealthSample>> {
        self.health_between(start, end)
    }
}
