//! Credential service
//!
//! Registration and login workflows over the password hasher, the token
//! codec, and the user store.

use std::sync::Arc;

use chrono::Duration;
use thiserror::Error;

use crate::models::User;
use crate::store::{StoreError, UserStore};

use super::password::{hash_password, verify_password, PasswordError};
use super::token::{TokenCodec, TokenError};

/// Auth workflow errors.
///
/// `InvalidCredentials` deliberately covers both "no such user" and "wrong
/// password" so the response never reveals which one happened. All token
/// verification failures surface as the single `Unauthorized` variant.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{field} already registered")]
    Conflict { field: &'static str },

    #[error("incorrect username or password")]
    InvalidCredentials,

    #[error("inactive user")]
    InactiveAccount,

    #[error("could not validate credentials")]
    Unauthorized,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("user store error: {0}")]
    Store(#[from] StoreError),

    #[error("token issuance failed: {0}")]
    Token(#[from] TokenError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<PasswordError> for AuthError {
    fn from(e: PasswordError) -> Self {
        match e {
            PasswordError::EmptyPassword => {
                AuthError::InvalidInput("password must not be empty".to_string())
            }
            PasswordError::HashingFailed(msg) => AuthError::Internal(msg),
        }
    }
}

/// Registration and login over an injected user store
pub struct CredentialService {
    store: Arc<dyn UserStore>,
    codec: Arc<TokenCodec>,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl CredentialService {
    pub fn new(
        store: Arc<dyn UserStore>,
        codec: Arc<TokenCodec>,
        token_ttl: Duration,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            store,
            codec,
            token_ttl,
            bcrypt_cost,
        }
    }

    /// Register a new user: uniqueness checks, hash, one store write.
    ///
    /// A concurrent registration that loses the store's uniqueness race is
    /// reported as the same `Conflict` the explicit pre-checks produce.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        if username.is_empty() {
            return Err(AuthError::InvalidInput(
                "username must not be empty".to_string(),
            ));
        }

        if self.store.find_by_username(username).await?.is_some() {
            return Err(AuthError::Conflict { field: "username" });
        }
        if self.store.find_by_email(email).await?.is_some() {
            return Err(AuthError::Conflict { field: "email" });
        }

        let password_hash = hash_password(password, self.bcrypt_cost)?;

        match self.store.create(username, email, &password_hash).await {
            Ok(user) => {
                tracing::info!(username, "user registered");
                Ok(user)
            }
            Err(StoreError::Duplicate { field }) => Err(AuthError::Conflict { field }),
            Err(e) => Err(AuthError::Store(e)),
        }
    }

    /// Log a user in and issue a session token. No writes; repeating a login
    /// simply issues a fresh, independently-expiring token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.active {
            return Err(AuthError::InactiveAccount);
        }

        Ok(self.codec.issue(&user.username, self.token_ttl)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryUserStore, UserUpdate};
    use jsonwebtoken::Algorithm;

    const TEST_COST: u32 = 4;

    fn service() -> (CredentialService, Arc<InMemoryUserStore>) {
        let store = Arc::new(InMemoryUserStore::new());
        let codec = Arc::new(TokenCodec::new("service-test-secret", Algorithm::HS256));
        let service = CredentialService::new(
            store.clone(),
            codec,
            Duration::minutes(30),
            TEST_COST,
        );
        (service, store)
    }

    #[tokio::test]
    async fn register_stores_a_hash_not_the_password() {
        let (service, _) = service();

        let user = service
            .register("alice", "alice@example.com", "hunter2pw")
            .await
            .unwrap();

        assert_eq!(user.username, "alice");
        assert!(user.active);
        assert_ne!(user.password_hash, "hunter2pw");
        assert!(verify_password("hunter2pw", &user.password_hash));
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let (service, _) = service();
        service
            .register("alice", "alice@example.com", "hunter2pw")
            .await
            .unwrap();

        let err = service
            .register("alice", "other@example.com", "hunter2pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict { field: "username" }));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let (service, _) = service();
        service
            .register("alice", "alice@example.com", "hunter2pw")
            .await
            .unwrap();

        let err = service
            .register("bob", "alice@example.com", "hunter2pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict { field: "email" }));
    }

    #[tokio::test]
    async fn empty_inputs_are_invalid() {
        let (service, _) = service();

        let err = service
            .register("", "alice@example.com", "hunter2pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput(_)));

        let err = service
            .register("alice", "alice@example.com", "")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn login_issues_a_verifiable_token() {
        let (service, _) = service();
        service
            .register("alice", "alice@example.com", "hunter2pw")
            .await
            .unwrap();

        let token = service.login("alice", "hunter2pw").await.unwrap();

        let codec = TokenCodec::new("service-test-secret", Algorithm::HS256);
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_are_indistinguishable() {
        let (service, _) = service();
        service
            .register("alice", "alice@example.com", "hunter2pw")
            .await
            .unwrap();

        let no_user = service.login("mallory", "hunter2pw").await.unwrap_err();
        let bad_password = service.login("alice", "wrongpw").await.unwrap_err();

        assert!(matches!(no_user, AuthError::InvalidCredentials));
        assert!(matches!(bad_password, AuthError::InvalidCredentials));
        assert_eq!(no_user.to_string(), bad_password.to_string());
    }

    #[tokio::test]
    async fn inactive_account_fails_even_with_the_right_password() {
        let (service, store) = service();
        let user = service
            .register("alice", "alice@example.com", "hunter2pw")
            .await
            .unwrap();

        store
            .update(
                user.id,
                UserUpdate {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = service.login("alice", "hunter2pw").await.unwrap_err();
        assert!(matches!(err, AuthError::InactiveAccount));
    }

    #[tokio::test]
    async fn losing_the_store_race_surfaces_as_conflict() {
        let (service, store) = service();

        // Simulate another request winning between the pre-check and the
        // write by seeding the store through a second handle.
        let err = match store.create("alice", "alice@example.com", "hash").await {
            Ok(_) => service
                .register("alice", "elsewhere@example.com", "hunter2pw")
                .await
                .unwrap_err(),
            Err(e) => panic!("seed insert failed: {e}"),
        };

        assert!(matches!(err, AuthError::Conflict { field: "username" }));
    }
}
