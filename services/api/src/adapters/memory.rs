//! services/api/src/adapters/memory.rs
//!
//! The in-memory implementation of the `UserStore` port. State lives for the
//! process lifetime only; nothing survives a restart. Ids are monotonically
//! increasing counter strings.

use async_trait::async_trait;
use exercise_tracker_core::domain::{Exercise, User};
use exercise_tracker_core::ports::{PortError, PortResult, UserStore};
use tokio::sync::RwLock;

struct StoredUser {
    id: String,
    username: String,
    exercises: Vec<Exercise>,
}

impl StoredUser {
    fn to_domain(&self) -> User {
        User {
            id: self.id.clone(),
            username: self.username.clone(),
        }
    }
}

struct Inner {
    users: Vec<StoredUser>,
    next_id: u64,
}

/// An in-memory store that implements the `UserStore` port.
///
/// The lock gives safe concurrent reads/appends across requests; no further
/// ordering guarantees are provided or needed.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty `MemoryStore`.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                users: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, username: &str) -> PortResult<User> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id.to_string();
        inner.next_id += 1;
        let stored = StoredUser {
            id,
            username: username.to_string(),
            exercises: Vec::new(),
        };
        let user = stored.to_domain();
        inner.users.push(stored);
        Ok(user)
    }

    async fn list_users(&self) -> PortResult<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().map(StoredUser::to_domain).collect())
    }

    async fn find_user(&self, user_id: &str) -> PortResult<User> {
        let inner = self.inner.read().await;
        inner
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(StoredUser::to_domain)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    async fn append_exercise(&self, user_id: &str, exercise: Exercise) -> PortResult<User> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))?;
        stored.exercises.push(exercise);
        Ok(stored.to_domain())
    }

    async fn exercises_for_user(&self, user_id: &str) -> PortResult<Vec<Exercise>> {
        let inner = self.inner.read().await;
        inner
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.exercises.clone())
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn exercise(description: &str, day: u32) -> Exercise {
        Exercise {
            description: description.to_string(),
            duration: 10,
            date: NaiveDate::from_ymd_opt(2023, 1, day).unwrap(),
        }
    }

    #[tokio::test]
    async fn ids_are_monotonic_counter_strings() {
        let store = MemoryStore::new();
        let a = store.create_user("alice").await.unwrap();
        let b = store.create_user("bob").await.unwrap();
        assert_eq!(a.id, "1");
        assert_eq!(b.id, "2");
    }

    #[tokio::test]
    async fn duplicate_usernames_are_allowed() {
        let store = MemoryStore::new();
        let a = store.create_user("alice").await.unwrap();
        let b = store.create_user("alice").await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.list_users().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn list_preserves_registration_order() {
        let store = MemoryStore::new();
        for name in ["carol", "alice", "bob"] {
            store.create_user(name).await.unwrap();
        }
        let names: Vec<String> = store
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["carol", "alice", "bob"]);
    }

    #[tokio::test]
    async fn exercises_come_back_in_insertion_order() {
        let store = MemoryStore::new();
        let user = store.create_user("alice").await.unwrap();
        store.append_exercise(&user.id, exercise("later", 20)).await.unwrap();
        store.append_exercise(&user.id, exercise("earlier", 5)).await.unwrap();
        let log = store.exercises_for_user(&user.id).await.unwrap();
        assert_eq!(log[0].description, "later");
        assert_eq!(log[1].description, "earlier");
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.find_user("999").await,
            Err(PortError::NotFound(_))
        ));
        assert!(matches!(
            store.append_exercise("999", exercise("run", 1)).await,
            Err(PortError::NotFound(_))
        ));
        assert!(matches!(
            store.exercises_for_user("999").await,
            Err(PortError::NotFound(_))
        ));
    }
}
