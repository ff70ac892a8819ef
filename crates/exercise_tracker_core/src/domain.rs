//! crates/exercise_tracker_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::NaiveDate;

/// Represents a registered user.
///
/// The id is opaque: the in-memory store issues counter strings, the Postgres
/// store issues UUIDs. Callers only rely on it being a stable lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
}

/// Represents one logged activity record belonging to exactly one user.
///
/// Immutable once appended; there is no update or delete operation anywhere
/// in the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub description: String,
    pub duration: i64,
    pub date: NaiveDate,
}
