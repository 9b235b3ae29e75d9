//! Port for swap persistence and conditional status transitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Swap, SwapStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by swap store adapters.
    pub enum SwapStoreError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "swap store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "swap store query failed: {message}",
    }
}

/// Port for writing swaps and committing their lifecycle transitions.
///
/// `transition` is the mutual-exclusion point for concurrent respond/cancel
/// calls: the update applies only while the stored status equals `from`, so
/// exactly one of two racing callers observes `true`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapStore: Send + Sync {
    /// Persist a new swap.
    async fn insert(&self, swap: &Swap) -> Result<(), SwapStoreError>;

    /// Find a swap by id.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Swap>, SwapStoreError>;

    /// Atomically move a swap from `from` to `to`, stamping `completed_at`.
    ///
    /// Returns `false` when the stored status differed from `from` (or the
    /// swap does not exist), in which case nothing was written.
    async fn transition(
        &self,
        id: &Uuid,
        from: SwapStatus,
        to: SwapStatus,
        completed_at: DateTime<Utc>,
    ) -> Result<bool, SwapStoreError>;

    /// All swaps where the user is requester or recipient, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Swap>, SwapStoreError>;
}

/// Fixture implementation for tests that do not exercise swap persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSwapStore;

#[async_trait]
impl SwapStore for FixtureSwapStore {
    async fn insert(&self, _swap: &Swap) -> Result<(), SwapStoreError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &Uuid) -> Result<Option<Swap>, SwapStoreError> {
        Ok(None)
    }

    async fn transition(
        &self,
        _id: &Uuid,
        _from: SwapStatus,
        _to: SwapStatus,
        _completed_at: DateTime<Utc>,
    ) -> Result<bool, SwapStoreError> {
        Ok(true)
    }

    async fn list_for_user(&self, _user_id: &UserId) -> Result<Vec<Swap>, SwapStoreError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_list_returns_empty() {
        let store = FixtureSwapStore;
        let listed = store
            .list_for_user(&UserId::random())
            .await
            .expect("fixture list succeeds");
        assert!(listed.is_empty());
    }

    #[rstest]
    fn query_error_formats_message() {
        let err = SwapStoreError::query("broken sql");
        assert!(err.to_string().contains("broken sql"));
    }
}
