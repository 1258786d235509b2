//! # lifelog-core
//!
//! Core library for lifelog - a personal tracker for mood, meals, money,
//! and health readings.
//!
//! This library provides:
//! - Domain types for the four record collections
//! - Database storage layer with SQLite
//! - Analytics over week, month, and year ranges
//! - CSV export
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use lifelog_core::analytics::{AnalyticsService, TimeRange};
//! use lifelog_core::{Config, Database};
//! use std::sync::Arc;
//!
//! // Load configuration
//! let config = Config::load().expect("failed to load config");
//!
//! // Open database
//! let db = Database::open(&config.resolved_database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let zone = config.analytics.calendar_zone().expect("bad timezone");
//! let service = AnalyticsService::new(Arc::new(db), zone);
//! let report = service
//!     .compute_analytics_blocking(TimeRange::Month)
//!     .expect("failed to compute analytics");
//! println!("{} days", report.mood_trend.len());
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod format;
pub mod logging;
pub mod types;
