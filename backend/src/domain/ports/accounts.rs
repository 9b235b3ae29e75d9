//! Driving port for account registration and profile reads.

use async_trait::async_trait;

use crate::domain::{DisplayName, Error, User, UserId, Username};

/// Parameters for registering a new account.
#[derive(Clone)]
pub struct NewAccount {
    pub username: Username,
    pub display_name: DisplayName,
    pub password: String,
}

impl std::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAccount")
            .field("username", &self.username)
            .field("display_name", &self.display_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Use-case port for the account collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Create an account with the configured signup bonus balance.
    async fn register(&self, account: NewAccount) -> Result<User, Error>;

    /// Profile of the authenticated caller.
    async fn current_user(&self, user_id: UserId) -> Result<User, Error>;
}

/// Fixture implementation rejecting every account operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountsCommand;

#[async_trait]
impl AccountsCommand for FixtureAccountsCommand {
    async fn register(&self, _account: NewAccount) -> Result<User, Error> {
        Err(Error::service_unavailable("accounts command not wired"))
    }

    async fn current_user(&self, _user_id: UserId) -> Result<User, Error> {
        Err(Error::not_found("user not found"))
    }
}
