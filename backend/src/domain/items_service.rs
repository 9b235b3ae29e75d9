//! Item catalogue domain service.
//!
//! Thin CRUD around the item store. The one rule with teeth lives here: an
//! item reserved by an in-flight swap (`pending`) cannot be deleted, so a
//! swap never dangles over a missing row while it can still be resolved.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ItemStore, ItemStoreError, ItemsCommand, ItemsQuery};
use crate::domain::{Error, Identity, Item, ItemDraft, ItemStatus, UserId};

/// Item catalogue service implementing the driving ports.
#[derive(Clone)]
pub struct ItemService<I> {
    items: Arc<I>,
}

impl<I> ItemService<I> {
    /// Create a new service over the given item store.
    pub fn new(items: Arc<I>) -> Self {
        Self { items }
    }
}

impl<I> ItemService<I>
where
    I: ItemStore,
{
    fn map_item_error(error: ItemStoreError) -> Error {
        match error {
            ItemStoreError::Connection { message } => {
                Error::service_unavailable(format!("item store unavailable: {message}"))
            }
            ItemStoreError::Query { message } => {
                Error::internal(format!("item store error: {message}"))
            }
        }
    }

    async fn load_item(&self, item_id: &Uuid) -> Result<Item, Error> {
        self.items
            .find_by_id(item_id)
            .await
            .map_err(Self::map_item_error)?
            .ok_or_else(|| Error::not_found("Item not found"))
    }
}

#[async_trait]
impl<I> ItemsCommand for ItemService<I>
where
    I: ItemStore,
{
    async fn create_item(&self, owner: UserId, draft: ItemDraft) -> Result<Item, Error> {
        let item = Item::new(Uuid::new_v4(), owner, draft, Utc::now())
            .map_err(|error| Error::invalid_request(error.to_string()))?;

        self.items
            .insert(&item)
            .await
            .map_err(Self::map_item_error)?;
        debug!(item_id = %item.id, "item listed");
        Ok(item)
    }

    async fn delete_item(&self, actor: Identity, item_id: Uuid) -> Result<(), Error> {
        let item = self.load_item(&item_id).await?;

        if !actor.can_manage_item(&item) {
            return Err(Error::not_authorized("Not authorized"));
        }
        if item.status == ItemStatus::Pending {
            return Err(Error::item_unavailable(
                "Item is reserved by a pending swap",
            ));
        }

        let removed = self
            .items
            .delete(&item_id)
            .await
            .map_err(Self::map_item_error)?;
        if !removed {
            return Err(Error::not_found("Item not found"));
        }
        Ok(())
    }
}

#[async_trait]
impl<I> ItemsQuery for ItemService<I>
where
    I: ItemStore,
{
    async fn list_items(&self) -> Result<Vec<Item>, Error> {
        self.items.list().await.map_err(Self::map_item_error)
    }

    async fn get_item(&self, item_id: Uuid) -> Result<Item, Error> {
        self.load_item(&item_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockItemStore;

    fn draft() -> ItemDraft {
        ItemDraft {
            title: "Denim jacket".to_owned(),
            description: "Light fade".to_owned(),
            category: "outerwear".to_owned(),
            size: "L".to_owned(),
            condition: "fair".to_owned(),
            points_value: 30,
        }
    }

    fn stored_item(owner: &UserId, status: ItemStatus) -> Item {
        let mut item = Item::new(Uuid::new_v4(), owner.clone(), draft(), Utc::now())
            .expect("valid item");
        item.status = status;
        item
    }

    #[tokio::test]
    async fn create_persists_an_available_item() {
        let owner = UserId::random();
        let mut items = MockItemStore::new();
        items
            .expect_insert()
            .withf(|item: &Item| item.status == ItemStatus::Available)
            .times(1)
            .return_once(|_| Ok(()));

        let service = ItemService::new(Arc::new(items));
        let item = service
            .create_item(owner.clone(), draft())
            .await
            .expect("create succeeds");
        assert_eq!(item.owner, owner);
        assert!(item.is_available());
    }

    #[tokio::test]
    async fn create_rejects_invalid_draft_without_store_calls() {
        let service = ItemService::new(Arc::new(MockItemStore::new()));
        let err = service
            .create_item(
                UserId::random(),
                ItemDraft {
                    points_value: -10,
                    ..draft()
                },
            )
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn delete_requires_owner_or_admin() {
        let item = stored_item(&UserId::random(), ItemStatus::Available);
        let item_id = item.id;

        let mut items = MockItemStore::new();
        items
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(item)));

        let service = ItemService::new(Arc::new(items));
        let err = service
            .delete_item(Identity::user(UserId::random()), item_id)
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::NotAuthorized);
    }

    #[tokio::test]
    async fn delete_refuses_items_reserved_by_a_swap() {
        let owner = UserId::random();
        let item = stored_item(&owner, ItemStatus::Pending);
        let item_id = item.id;

        let mut items = MockItemStore::new();
        items
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(item)));

        let service = ItemService::new(Arc::new(items));
        let err = service
            .delete_item(Identity::user(owner), item_id)
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::ItemUnavailable);
    }

    #[tokio::test]
    async fn admin_can_delete_foreign_swapped_item() {
        let item = stored_item(&UserId::random(), ItemStatus::Swapped);
        let item_id = item.id;

        let mut items = MockItemStore::new();
        items
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(item)));
        items
            .expect_delete()
            .withf(move |id| id == &item_id)
            .times(1)
            .return_once(|_| Ok(true));

        let service = ItemService::new(Arc::new(items));
        service
            .delete_item(Identity::admin(UserId::random()), item_id)
            .await
            .expect("admin delete succeeds");
    }

    #[tokio::test]
    async fn get_missing_item_is_not_found() {
        let mut items = MockItemStore::new();
        items.expect_find_by_id().times(1).return_once(|_| Ok(None));

        let service = ItemService::new(Arc::new(items));
        let err = service
            .get_item(Uuid::new_v4())
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
