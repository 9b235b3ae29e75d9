//! Port for user persistence and the points ledger.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user store adapters.
    pub enum UserStoreError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "user store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user store query failed: {message}",
        /// No user row matched the given id.
        NotFound =>
            "user not found",
        /// The username is already taken.
        DuplicateUsername { username: String } =>
            "username already taken: {username}",
        /// A balance adjustment would leave the balance negative.
        InsufficientFunds { requested: i64 } =>
            "balance cannot cover {requested} points",
    }
}

/// Stored credential material for one user.
///
/// Only the account collaborator reads this; handlers and the coordinator
/// see [`Identity`](crate::domain::Identity) instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRecord {
    pub user_id: UserId,
    pub is_admin: bool,
    pub salt: String,
    pub password_digest: String,
}

/// New account row: the user plus its credential material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub user: User,
    pub salt: String,
    pub password_digest: String,
}

/// Port for reading users and mutating point balances.
///
/// `adjust_balance` is the single choke point for balance mutation: the
/// adapter must apply the delta and the non-negativity check in one atomic
/// store operation, never as a read-modify-write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user with credential material.
    async fn insert(&self, record: &NewUserRecord) -> Result<(), UserStoreError>;

    /// Find a user by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError>;

    /// Find a user by login handle.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserStoreError>;

    /// Read credential material for a login handle.
    async fn find_login(&self, username: &str) -> Result<Option<LoginRecord>, UserStoreError>;

    /// Atomically apply `delta` to the user's balance and return the new
    /// balance.
    ///
    /// Fails with [`UserStoreError::InsufficientFunds`] when the resulting
    /// balance would be negative and with [`UserStoreError::NotFound`] when
    /// no user row matched.
    async fn adjust_balance(&self, id: &UserId, delta: i64) -> Result<i64, UserStoreError>;
}

/// Fixture implementation for tests that do not exercise user persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserStore;

#[async_trait]
impl UserStore for FixtureUserStore {
    async fn insert(&self, _record: &NewUserRecord) -> Result<(), UserStoreError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserStoreError> {
        Ok(None)
    }

    async fn find_by_username(&self, _username: &str) -> Result<Option<User>, UserStoreError> {
        Ok(None)
    }

    async fn find_login(&self, _username: &str) -> Result<Option<LoginRecord>, UserStoreError> {
        Ok(None)
    }

    async fn adjust_balance(&self, _id: &UserId, _delta: i64) -> Result<i64, UserStoreError> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_lookups_return_none() {
        let store = FixtureUserStore;
        assert!(store
            .find_by_id(&UserId::random())
            .await
            .expect("fixture lookup succeeds")
            .is_none());
        assert!(store
            .find_login("ada")
            .await
            .expect("fixture lookup succeeds")
            .is_none());
    }

    #[rstest]
    fn insufficient_funds_names_the_request() {
        let err = UserStoreError::insufficient_funds(40_i64);
        assert_eq!(err.to_string(), "balance cannot cover 40 points");
    }

    #[rstest]
    fn not_found_is_a_unit_variant() {
        assert_eq!(UserStoreError::not_found().to_string(), "user not found");
    }
}
