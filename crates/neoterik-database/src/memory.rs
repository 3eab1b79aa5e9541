//! In-memory user repository backed by `DashMap`.
//!
//! Used when no database URL is configured and throughout the test suites.
//! Records are lost on restart.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use neoterik_core::error::AppError;
use neoterik_core::result::AppResult;
use neoterik_entity::user::{CreateUser, User, normalize_email};

use crate::repositories::user::UserRepository;

/// Process-local user store.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    /// Users keyed by normalized email.
    by_email: Arc<DashMap<String, User>>,
    /// Secondary index from id to normalized email.
    email_by_id: Arc<DashMap<Uuid, String>>,
}

impl MemoryUserRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    /// Whether the store holds no users.
    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }

    /// Removes a user by id. Returns `true` if a record was removed.
    pub fn remove(&self, id: Uuid) -> bool {
        match self.email_by_id.remove(&id) {
            Some((_, email)) => self.by_email.remove(&email).is_some(),
            None => false,
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .by_email
            .get(&normalize_email(email))
            .map(|entry| entry.value().clone()))
    }

    async fn create(&self, user: &CreateUser) -> AppResult<User> {
        let key = normalize_email(&user.email);

        match self.by_email.entry(key.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict("User already exists")),
            Entry::Vacant(slot) => {
                let record = User {
                    id: Uuid::new_v4(),
                    email: key.clone(),
                    password_hash: user.password_hash.clone(),
                    display_name: user.display_name.clone(),
                    created_at: Utc::now(),
                };
                self.email_by_id.insert(record.id, key);
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let Some(email) = self.email_by_id.get(&id).map(|e| e.value().clone()) else {
            return Ok(None);
        };
        Ok(self.by_email.get(&email).map(|entry| entry.value().clone()))
    }
}
