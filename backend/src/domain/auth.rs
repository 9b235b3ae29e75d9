//! Caller identity and capability checks.
//!
//! The identity collaborator hands each operation an authenticated caller id
//! plus an administrator flag; the coordinator trusts both without
//! re-validating credentials. Authorisation rules that mix "owner or
//! administrator" live here as capability methods so each rule is defined
//! once rather than scattered across handlers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Item, Swap, UserId};

/// Authenticated caller as supplied by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub is_admin: bool,
}

impl Identity {
    /// Identity for a regular (non-administrator) user.
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id,
            is_admin: false,
        }
    }

    /// Identity carrying the administrator capability.
    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            is_admin: true,
        }
    }

    /// A pending swap may be cancelled by its requester or an administrator.
    pub fn can_cancel(&self, swap: &Swap) -> bool {
        self.user_id == swap.requester || self.is_admin
    }

    /// An item may be deleted by its owner or an administrator.
    pub fn can_manage_item(&self, item: &Item) -> bool {
        self.user_id == item.owner || self.is_admin
    }
}

/// Validation errors for login credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    EmptyUsername,
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Username and password pair presented at login.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: String,
}

impl LoginCredentials {
    /// Validate and construct credentials from their parts.
    pub fn try_from_parts(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, LoginValidationError> {
        let username = username.into();
        let password = password.into();
        if username.trim().is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self { username, password })
    }

    /// Login handle.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Raw password; never logged or serialised.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Swap, SwapDraft};
    use chrono::Utc;
    use uuid::Uuid;

    fn swap_between(requester: UserId, recipient: UserId) -> Swap {
        Swap::open(SwapDraft {
            id: Uuid::new_v4(),
            requester,
            recipient,
            requested_item: Uuid::new_v4(),
            offered_item: None,
            points_offered: 0,
            created_at: Utc::now(),
        })
        .expect("valid swap")
    }

    #[test]
    fn requester_can_cancel_own_swap() {
        let requester = UserId::random();
        let swap = swap_between(requester.clone(), UserId::random());
        assert!(Identity::user(requester).can_cancel(&swap));
    }

    #[test]
    fn stranger_cannot_cancel() {
        let swap = swap_between(UserId::random(), UserId::random());
        assert!(!Identity::user(UserId::random()).can_cancel(&swap));
    }

    #[test]
    fn admin_can_cancel_any_swap() {
        let swap = swap_between(UserId::random(), UserId::random());
        assert!(Identity::admin(UserId::random()).can_cancel(&swap));
    }

    #[test]
    fn credentials_redact_password_in_debug() {
        let creds = LoginCredentials::try_from_parts("ada", "secret").expect("valid creds");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn credentials_reject_blank_parts() {
        assert_eq!(
            LoginCredentials::try_from_parts(" ", "pw").expect_err("must fail"),
            LoginValidationError::EmptyUsername
        );
        assert_eq!(
            LoginCredentials::try_from_parts("ada", "").expect_err("must fail"),
            LoginValidationError::EmptyPassword
        );
    }
}
