//! User persistence
//!
//! The auth core talks to users through the [`UserStore`] trait and only ever
//! sees immutable snapshots; mutation goes through an explicit `update` call.
//! [`PgUserStore`] is the production implementation, [`InMemoryUserStore`]
//! backs hermetic tests and local development.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::User;

mod memory;
mod postgres;

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;

/// Store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique constraint rejected the write. `field` is "username" or
    /// "email"; this is how a lost check-then-create race surfaces.
    #[error("{field} is already taken")]
    Duplicate { field: &'static str },

    #[error("database error: {0}")]
    Database(String),
}

/// Fields that may change on an existing user. `password_hash` is always a
/// hash produced by the password module, never plaintext.
#[derive(Debug, Default, Clone)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub active: Option<bool>,
}

/// Repository interface for credential records.
///
/// Each call is atomic and consistent on its own; the store enforces
/// username/email uniqueness so concurrent registrations cannot both win.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError>;

    async fn update(&self, id: Uuid, changes: UserUpdate) -> Result<Option<User>, StoreError>;
}
