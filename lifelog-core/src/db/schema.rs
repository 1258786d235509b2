//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.
//!
//! Timestamps are stored as RFC 3339 UTC text with millisecond precision
//! (`2024-03-01T08:15:00.000Z`), so string comparison in range queries
//! matches chronological order.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: Record collections
    r#"
    CREATE TABLE IF NOT EXISTS mood_entries (
        id               TEXT PRIMARY KEY,
        mood_level       INTEGER NOT NULL CHECK (mood_level BETWEEN 1 AND 10),
        notes            TEXT NOT NULL DEFAULT '',
        created_at       TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS nutrition_entries (
        id               TEXT PRIMARY KEY,
        meal_type        TEXT NOT NULL,
        food_name        TEXT NOT NULL,
        calories         REAL NOT NULL CHECK (calories >= 0),
        protein          REAL NOT NULL DEFAULT 0,
        fat              REAL NOT NULL DEFAULT 0,
        carbs            REAL NOT NULL DEFAULT 0,
        serving_size     TEXT NOT NULL DEFAULT '',
        created_at       TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS financial_entries (
        id               TEXT PRIMARY KEY,
        entry_type       TEXT NOT NULL CHECK (entry_type IN ('income', 'expense')),
        amount           REAL NOT NULL CHECK (amount >= 0),
        description      TEXT NOT NULL DEFAULT '',
        category         TEXT NOT NULL DEFAULT '',
        created_at       TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS health_data (
        id               TEXT PRIMARY KEY,
        data_type        TEXT NOT NULL,
        value            REAL NOT NULL,
        unit             TEXT NOT NULL,
        source           TEXT NOT NULL DEFAULT 'manual',
        recorded_at      TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_mood_created ON mood_entries(created_at);
    CREATE INDEX IF NOT EXISTS idx_nutrition_created ON nutrition_entries(created_at);
    CREATE INDEX IF NOT EXISTS idx_financial_created ON financial_entries(created_at);
    CREATE INDEX IF NOT EXISTS idx_health_recorded ON health_data(recorded_at);
    CREATE INDEX IF NOT EXISTS idx_health_type_recorded ON health_data(data_type, recorded_at);
    "#,
    // Version 2: Financial categories
    r#"
    CREATE TABLE IF NOT EXISTS financial_categories (
        id               TEXT PRIMARY KEY,
        name             TEXT NOT NULL,
        entry_type       TEXT NOT NULL CHECK (entry_type IN ('income', 'expense')),
        color            TEXT NOT NULL DEFAULT '',
        created_at       TEXT NOT NULL,

        UNIQUE(name, entry_type)
    );
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            conn.execute_batch(migration)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Migrations complete"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        // Run migrations twice - should be idempotent
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_tables_created() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let tables = [
            "mood_entries",
            "nutrition_entries",
            "financial_entries",
            "financial_categories",
            "health_data",
        ];

        for table in tables {
            let exists: i32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
                    [table],
                    |r| r.get(0),
                )
                .unwrap();
            assert_eq!(exists, 1, "Table {} should exist", table);
        }
    }

    #[test]
    fn test_mood_level_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO mood_entries (id, mood_level, created_at) VALUES ('m1', 11, '2024-01-01T00:00:00.000Z')",
            [],
        );
        assert!(result.is_err(), "mood level 11 should violate the check");
    }
}
