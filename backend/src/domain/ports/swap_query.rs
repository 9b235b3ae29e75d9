//! Driving port for swap reads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{DisplayName, Error, ItemStatus, Swap, UserId};

/// Compact user representation embedded in swap views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[schema(value_type = String)]
    pub id: UserId,
    #[schema(value_type = String)]
    pub display_name: DisplayName,
}

/// Compact item representation embedded in swap views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub id: Uuid,
    pub title: String,
    pub status: ItemStatus,
    pub points_value: i64,
}

/// A swap with its referenced users and items resolved.
///
/// Summaries are optional: a user or item row removed after the swap reached
/// a terminal state resolves to nothing rather than failing the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwapView {
    #[serde(flatten)]
    pub swap: Swap,
    pub requester_summary: Option<UserSummary>,
    pub recipient_summary: Option<UserSummary>,
    pub requested_item_summary: Option<ItemSummary>,
    pub offered_item_summary: Option<ItemSummary>,
}

/// Use-case port for reading a user's swaps.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapQuery: Send + Sync {
    /// All swaps where the user is requester or recipient, newest first,
    /// with summaries resolved.
    async fn list_swaps(&self, user_id: UserId) -> Result<Vec<SwapView>, Error>;
}

/// Fixture implementation returning no swaps.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSwapQuery;

#[async_trait]
impl SwapQuery for FixtureSwapQuery {
    async fn list_swaps(&self, _user_id: UserId) -> Result<Vec<SwapView>, Error> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_returns_empty() {
        let query = FixtureSwapQuery;
        let listed = query
            .list_swaps(UserId::random())
            .await
            .expect("fixture list succeeds");
        assert!(listed.is_empty());
    }
}
