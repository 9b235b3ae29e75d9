//! Item listing data model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::UserId;

/// Availability state of a listed item.
///
/// The three states are mutually exclusive: an item is open to new swap
/// requests (`Available`), reserved by an in-flight swap (`Pending`), or
/// permanently exchanged (`Swapped`). Transitions happen only through the
/// item store's compare-and-set once a swap references the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Available,
    Pending,
    Swapped,
}

impl ItemStatus {
    /// Canonical lowercase name, matching the persisted representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Pending => "pending",
            Self::Swapped => "swapped",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown item status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised item status: {0}")]
pub struct ParseItemStatusError(pub String);

impl FromStr for ItemStatus {
    type Err = ParseItemStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "pending" => Ok(Self::Pending),
            "swapped" => Ok(Self::Swapped),
            other => Err(ParseItemStatusError(other.to_owned())),
        }
    }
}

/// Validation errors returned by [`Item::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemValidationError {
    #[error("item title must not be empty")]
    EmptyTitle,
    #[error("item description must not be empty")]
    EmptyDescription,
    #[error("item points value must not be negative")]
    NegativePointsValue,
}

/// Listing details supplied by the owner at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub size: String,
    pub condition: String,
    pub points_value: i64,
}

/// A listed item.
///
/// ## Invariants
/// - `status` is always one of the three [`ItemStatus`] values.
/// - Status transitions are driven exclusively by the swap coordinator once
///   a swap referencing the item exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub owner: UserId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub size: String,
    pub condition: String,
    pub points_value: i64,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Build a new `available` item from an owner and draft.
    pub fn new(
        id: Uuid,
        owner: UserId,
        draft: ItemDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ItemValidationError> {
        if draft.title.trim().is_empty() {
            return Err(ItemValidationError::EmptyTitle);
        }
        if draft.description.trim().is_empty() {
            return Err(ItemValidationError::EmptyDescription);
        }
        if draft.points_value < 0 {
            return Err(ItemValidationError::NegativePointsValue);
        }

        Ok(Self {
            id,
            owner,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            size: draft.size,
            condition: draft.condition,
            points_value: draft.points_value,
            status: ItemStatus::Available,
            created_at,
        })
    }

    /// Whether the item is open to new swap requests.
    pub fn is_available(&self) -> bool {
        self.status == ItemStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn draft() -> ItemDraft {
        ItemDraft {
            title: "Wool coat".to_owned(),
            description: "Barely worn".to_owned(),
            category: "outerwear".to_owned(),
            size: "M".to_owned(),
            condition: "good".to_owned(),
            points_value: 50,
        }
    }

    #[rstest]
    #[case(ItemStatus::Available, "available")]
    #[case(ItemStatus::Pending, "pending")]
    #[case(ItemStatus::Swapped, "swapped")]
    fn status_round_trips_through_strings(#[case] status: ItemStatus, #[case] raw: &str) {
        assert_eq!(status.as_str(), raw);
        assert_eq!(raw.parse::<ItemStatus>().expect("parses"), status);
    }

    #[test]
    fn status_rejects_unknown_values() {
        let err = "reserved".parse::<ItemStatus>().expect_err("must fail");
        assert_eq!(err, ParseItemStatusError("reserved".to_owned()));
    }

    #[test]
    fn new_items_start_available() {
        let item =
            Item::new(Uuid::new_v4(), UserId::random(), draft(), Utc::now()).expect("valid item");
        assert!(item.is_available());
        assert_eq!(item.points_value, 50);
    }

    #[rstest]
    #[case(ItemDraft { title: " ".to_owned(), ..draft() }, ItemValidationError::EmptyTitle)]
    #[case(ItemDraft { description: String::new(), ..draft() }, ItemValidationError::EmptyDescription)]
    #[case(ItemDraft { points_value: -1, ..draft() }, ItemValidationError::NegativePointsValue)]
    fn new_rejects_invalid_drafts(
        #[case] bad: ItemDraft,
        #[case] expected: ItemValidationError,
    ) {
        let err =
            Item::new(Uuid::new_v4(), UserId::random(), bad, Utc::now()).expect_err("must fail");
        assert_eq!(err, expected);
    }
}
