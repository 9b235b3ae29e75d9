//! Driving port for item catalogue mutations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Identity, Item, ItemDraft, UserId};

/// Use-case port for creating and removing item listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemsCommand: Send + Sync {
    /// List a new item owned by the caller.
    async fn create_item(&self, owner: UserId, draft: ItemDraft) -> Result<Item, Error>;

    /// Remove a listing.
    ///
    /// Authorised for the owner or an administrator; refused while the item
    /// is reserved by an in-flight swap.
    async fn delete_item(&self, actor: Identity, item_id: Uuid) -> Result<(), Error>;
}

/// Fixture implementation rejecting every mutation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureItemsCommand;

#[async_trait]
impl ItemsCommand for FixtureItemsCommand {
    async fn create_item(&self, _owner: UserId, _draft: ItemDraft) -> Result<Item, Error> {
        Err(Error::service_unavailable("items command not wired"))
    }

    async fn delete_item(&self, _actor: Identity, _item_id: Uuid) -> Result<(), Error> {
        Err(Error::service_unavailable("items command not wired"))
    }
}
