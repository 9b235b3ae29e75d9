//! Port for credential verification.

use async_trait::async_trait;

use crate::domain::{Error, Identity, LoginCredentials};

/// Port turning presented credentials into an authenticated identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and return the caller's identity.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Identity, Error>;
}

/// Fixture implementation rejecting every login.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, _credentials: &LoginCredentials) -> Result<Identity, Error> {
        Err(Error::unauthorized("invalid credentials"))
    }
}
