//! crates/exercise_tracker_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases.

use async_trait::async_trait;

use crate::domain::{Exercise, User};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The store contract both persistence variants implement.
///
/// The in-memory store and the Postgres store are interchangeable behind this
/// trait and are selected at startup. The store is responsible for safe
/// concurrent reads/appends; no ordering or transactional guarantees are
/// imposed across requests.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Registers a new user. Usernames are not required to be unique.
    async fn create_user(&self, username: &str) -> PortResult<User>;

    /// Lists every registered user in the underlying store order.
    async fn list_users(&self) -> PortResult<Vec<User>>;

    /// Looks up a user by id. `NotFound` if no such user exists.
    async fn find_user(&self, user_id: &str) -> PortResult<User>;

    /// Appends an exercise to a user's log and returns the owning user.
    /// `NotFound` if the user does not exist; nothing is written in that case.
    async fn append_exercise(&self, user_id: &str, exercise: Exercise) -> PortResult<User>;

    /// Returns a user's full exercise log in insertion order.
    /// `NotFound` if the user does not exist.
    async fn exercises_for_user(&self, user_id: &str) -> PortResult<Vec<Exercise>>;
}
