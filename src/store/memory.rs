//! In-memory user store for tests and local development

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::User;

use super::{StoreError, UserStore, UserUpdate};

/// HashMap-backed store with the same uniqueness guarantees as the Postgres
/// schema. The mutex is held only for synchronous map access, never across an
/// await point.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().expect("user store mutex poisoned");
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().expect("user store mutex poisoned");
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let mut users = self.users.lock().expect("user store mutex poisoned");

        if users.values().any(|u| u.username == username) {
            return Err(StoreError::Duplicate { field: "username" });
        }
        if users.values().any(|u| u.email == email) {
            return Err(StoreError::Duplicate { field: "email" });
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            active: true,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserUpdate) -> Result<Option<User>, StoreError> {
        let mut users = self.users.lock().expect("user store mutex poisoned");

        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(active) = changes.active {
            user.active = active;
        }

        Ok(Some(user.clone()))
    }
}
