//! Database layer for lifelog
//!
//! This module provides the storage layer using SQLite with:
//! - Schema migrations
//! - Repository pattern for queries
//! - Same-day replacement of health readings

pub mod repo;
pub mod schema;

pub use repo::{CollectionCounts, Database};
