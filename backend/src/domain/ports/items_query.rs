//! Driving port for item catalogue reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Item};

/// Use-case port for browsing item listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemsQuery: Send + Sync {
    /// All listed items, newest first.
    async fn list_items(&self) -> Result<Vec<Item>, Error>;

    /// A single item by id.
    async fn get_item(&self, item_id: Uuid) -> Result<Item, Error>;
}

/// Fixture implementation exposing an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureItemsQuery;

#[async_trait]
impl ItemsQuery for FixtureItemsQuery {
    async fn list_items(&self) -> Result<Vec<Item>, Error> {
        Ok(Vec::new())
    }

    async fn get_item(&self, _item_id: Uuid) -> Result<Item, Error> {
        Err(Error::not_found("item not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;

    #[tokio::test]
    async fn fixture_get_is_not_found() {
        let query = FixtureItemsQuery;
        let err = query
            .get_item(Uuid::new_v4())
            .await
            .expect_err("fixture must miss");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
