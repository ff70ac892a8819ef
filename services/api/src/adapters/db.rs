//! services/api/src/adapters/db.rs
//!
//! The Postgres implementation of the `UserStore` port, backed by `sqlx`.
//! Ids are delegated to UUIDs here; the wire contract only requires them to
//! be opaque and stable. Exercises carry a `seq` column so the store can hand
//! the core query the log in insertion order, matching the in-memory variant.

use async_trait::async_trait;
use chrono::NaiveDate;
use exercise_tracker_core::domain::{Exercise, User};
use exercise_tracker_core::ports::{PortError, PortResult, UserStore};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A database adapter that implements the `UserStore` port.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Unparsable ids cannot reference a stored user, so they map straight
    /// to `NotFound` rather than a client error.
    fn parse_id(user_id: &str) -> PortResult<Uuid> {
        Uuid::parse_str(user_id)
            .map_err(|_| PortError::NotFound(format!("User {} not found", user_id)))
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    username: String,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id.to_string(),
            username: self.username,
        }
    }
}

#[derive(FromRow)]
struct ExerciseRecord {
    description: String,
    duration: i64,
    date: NaiveDate,
}
impl ExerciseRecord {
    fn to_domain(self) -> Exercise {
        Exercise {
            description: self.description,
            duration: self.duration,
            date: self.date,
        }
    }
}

//=========================================================================================
// `UserStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, username: &str) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, username) VALUES ($1, $2) RETURNING id, username",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(record.to_domain())
    }

    async fn list_users(&self) -> PortResult<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username FROM users ORDER BY seq ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(records.into_iter().map(UserRecord::to_domain).collect())
    }

    async fn find_user(&self, user_id: &str) -> PortResult<User> {
        let id = Self::parse_id(user_id)?;
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?
        .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))?;
        Ok(record.to_domain())
    }

    async fn append_exercise(&self, user_id: &str, exercise: Exercise) -> PortResult<User> {
        let user = self.find_user(user_id).await?;
        sqlx::query(
            "INSERT INTO exercises (user_id, description, duration, date) VALUES ($1, $2, $3, $4)",
        )
        .bind(Self::parse_id(&user.id)?)
        .bind(&exercise.description)
        .bind(exercise.duration)
        .bind(exercise.date)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(user)
    }

    async fn exercises_for_user(&self, user_id: &str) -> PortResult<Vec<Exercise>> {
        let user = self.find_user(user_id).await?;
        let records = sqlx::query_as::<_, ExerciseRecord>(
            "SELECT description, duration, date FROM exercises WHERE user_id = $1 ORDER BY seq ASC",
        )
        .bind(Self::parse_id(&user.id)?)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(records.into_iter().map(ExerciseRecord::to_domain).collect())
    }
}
