//! Account collaborator: registration, credential checks, profiles.
//!
//! Authentication is deliberately thin. Credentials are verified against a
//! salted SHA-256 digest stored on the user row; everything downstream of
//! login only ever sees an [`Identity`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::ports::{
    AccountsCommand, LoginService, NewAccount, NewUserRecord, UserStore, UserStoreError,
};
use crate::domain::{Error, Identity, LoginCredentials, User, UserId};

/// Account service implementing registration and login.
#[derive(Clone)]
pub struct AccountsService<U> {
    users: Arc<U>,
    signup_bonus: i64,
}

/// Compute the stored digest for a salt and password pair.
fn digest_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn generate_salt() -> String {
    let salt: [u8; 16] = rand::random();
    hex::encode(salt)
}

impl<U> AccountsService<U> {
    /// Create a new service granting `signup_bonus` points per registration.
    pub fn new(users: Arc<U>, signup_bonus: i64) -> Self {
        Self {
            users,
            signup_bonus,
        }
    }
}

impl<U> AccountsService<U>
where
    U: UserStore,
{
    fn map_user_error(error: UserStoreError) -> Error {
        match error {
            UserStoreError::Connection { message } => {
                Error::service_unavailable(format!("user store unavailable: {message}"))
            }
            UserStoreError::Query { message } => {
                Error::internal(format!("user store error: {message}"))
            }
            UserStoreError::DuplicateUsername { username } => {
                Error::invalid_request(format!("username already taken: {username}"))
            }
            UserStoreError::NotFound => Error::not_found("user not found"),
            UserStoreError::InsufficientFunds { .. } => {
                Error::internal("unexpected balance failure")
            }
        }
    }
}

#[async_trait]
impl<U> AccountsCommand for AccountsService<U>
where
    U: UserStore,
{
    async fn register(&self, account: NewAccount) -> Result<User, Error> {
        // Optimistic duplicate check for a friendlier error; the unique
        // index on username remains the authority under races.
        if self
            .users
            .find_by_username(account.username.as_ref())
            .await
            .map_err(Self::map_user_error)?
            .is_some()
        {
            return Err(Error::invalid_request(format!(
                "username already taken: {}",
                account.username
            )));
        }

        let user = User::new(
            UserId::random(),
            account.username,
            account.display_name,
            self.signup_bonus,
            false,
            Utc::now(),
        )
        .map_err(|error| Error::invalid_request(error.to_string()))?;

        let salt = generate_salt();
        let password_digest = digest_password(&salt, &account.password);
        let record = NewUserRecord {
            user: user.clone(),
            salt,
            password_digest,
        };

        self.users
            .insert(&record)
            .await
            .map_err(Self::map_user_error)?;
        debug!(user_id = %user.id(), "account registered");
        Ok(user)
    }

    async fn current_user(&self, user_id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(&user_id)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[async_trait]
impl<U> LoginService for AccountsService<U>
where
    U: UserStore,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Identity, Error> {
        let record = self
            .users
            .find_login(credentials.username())
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;

        let presented = digest_password(&record.salt, credentials.password());
        if presented != record.password_digest {
            return Err(Error::unauthorized("invalid credentials"));
        }

        Ok(Identity {
            user_id: record.user_id,
            is_admin: record.is_admin,
        })
    }
}
