//! Port for item persistence and availability transitions.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Item, ItemStatus};

use super::define_port_error;

define_port_error! {
    /// Errors raised by item store adapters.
    pub enum ItemStoreError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "item store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "item store query failed: {message}",
    }
}

/// Port for reading items and committing availability transitions.
///
/// `compare_and_set_status` is the only way an item's status changes once a
/// swap references it: the transition succeeds only when the stored status
/// equals `expected`, which closes the window between a precondition check
/// and its commit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Persist a new item.
    async fn insert(&self, item: &Item) -> Result<(), ItemStoreError>;

    /// Find an item by id.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Item>, ItemStoreError>;

    /// Read all items, newest first.
    async fn list(&self) -> Result<Vec<Item>, ItemStoreError>;

    /// Atomically move an item from `expected` to `new` status.
    ///
    /// Returns `false` when the stored status differed from `expected` (or
    /// the item no longer exists), in which case nothing was written.
    async fn compare_and_set_status(
        &self,
        id: &Uuid,
        expected: ItemStatus,
        new: ItemStatus,
    ) -> Result<bool, ItemStoreError>;

    /// Remove an item. Returns `false` when no row matched.
    async fn delete(&self, id: &Uuid) -> Result<bool, ItemStoreError>;
}

/// Fixture implementation for tests that do not exercise item persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureItemStore;

#[async_trait]
impl ItemStore for FixtureItemStore {
    async fn insert(&self, _item: &Item) -> Result<(), ItemStoreError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &Uuid) -> Result<Option<Item>, ItemStoreError> {
        Ok(None)
    }

    async fn list(&self) -> Result<Vec<Item>, ItemStoreError> {
        Ok(Vec::new())
    }

    async fn compare_and_set_status(
        &self,
        _id: &Uuid,
        _expected: ItemStatus,
        _new: ItemStatus,
    ) -> Result<bool, ItemStoreError> {
        Ok(true)
    }

    async fn delete(&self, _id: &Uuid) -> Result<bool, ItemStoreError> {
        Ok(false)
    }
}
