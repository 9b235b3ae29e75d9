//! Swap negotiation data model.
//!
//! A swap is a proposal from a requester to the owner of a requested item,
//! optionally backed by an offered item and/or a points offer. `pending` is
//! the sole initial state; `accepted`, `rejected`, and `cancelled` are
//! terminal and never re-entered.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::UserId;

/// Lifecycle state of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl SwapStatus {
    /// Canonical lowercase name, matching the persisted representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the state admits no further transitions.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown swap status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised swap status: {0}")]
pub struct ParseSwapStatusError(pub String);

impl FromStr for SwapStatus {
    type Err = ParseSwapStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ParseSwapStatusError(other.to_owned())),
        }
    }
}

/// Response chosen by the recipient of a pending swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SwapAction {
    Accept,
    Reject,
}

/// Error returned when parsing an unknown respond action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("action must be accept or reject, got: {0}")]
pub struct ParseSwapActionError(pub String);

impl FromStr for SwapAction {
    type Err = ParseSwapActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            other => Err(ParseSwapActionError(other.to_owned())),
        }
    }
}

/// Validation errors returned by [`Swap::open`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapValidationError {
    #[error("requester and recipient must differ")]
    SelfSwap,
    #[error("points offered must not be negative")]
    NegativePoints,
    #[error("requested and offered item must differ")]
    SameItem,
}

/// Components of a new swap proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapDraft {
    pub id: Uuid,
    pub requester: UserId,
    pub recipient: UserId,
    pub requested_item: Uuid,
    pub offered_item: Option<Uuid>,
    pub points_offered: i64,
    pub created_at: DateTime<Utc>,
}

/// A swap proposal between two users.
///
/// ## Invariants
/// - `requester != recipient`.
/// - `points_offered >= 0`.
/// - `status` only moves `pending -> {accepted, rejected, cancelled}`;
///   `completed_at` is set exactly when the swap leaves `pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Swap {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub requester: UserId,
    #[schema(value_type = String)]
    pub recipient: UserId,
    pub requested_item: Uuid,
    pub offered_item: Option<Uuid>,
    pub points_offered: i64,
    pub status: SwapStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Swap {
    /// Open a new `pending` swap from validated components.
    pub fn open(draft: SwapDraft) -> Result<Self, SwapValidationError> {
        if draft.requester == draft.recipient {
            return Err(SwapValidationError::SelfSwap);
        }
        if draft.points_offered < 0 {
            return Err(SwapValidationError::NegativePoints);
        }
        if draft.offered_item == Some(draft.requested_item) {
            return Err(SwapValidationError::SameItem);
        }

        Ok(Self {
            id: draft.id,
            requester: draft.requester,
            recipient: draft.recipient,
            requested_item: draft.requested_item,
            offered_item: draft.offered_item,
            points_offered: draft.points_offered,
            status: SwapStatus::Pending,
            created_at: draft.created_at,
            completed_at: None,
        })
    }

    /// Copy of this swap moved into a terminal state at `completed_at`.
    pub fn into_resolved(mut self, status: SwapStatus, completed_at: DateTime<Utc>) -> Self {
        self.status = status;
        self.completed_at = Some(completed_at);
        self
    }
}
