//! Driving port for swap lifecycle mutations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Identity, Swap, SwapAction, UserId};

/// Parameters for opening a new swap proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSwapPayload {
    pub requester: UserId,
    pub requested_item: Uuid,
    pub offered_item: Option<Uuid>,
    pub points_offered: i64,
}

/// Use-case port for creating, answering, and cancelling swaps.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapCommand: Send + Sync {
    /// Open a new pending swap against an available item.
    async fn request_swap(&self, payload: RequestSwapPayload) -> Result<Swap, Error>;

    /// Accept or reject a pending swap as its recipient.
    async fn respond_to_swap(
        &self,
        responder: UserId,
        swap_id: Uuid,
        action: SwapAction,
    ) -> Result<Swap, Error>;

    /// Cancel a pending swap as its requester or an administrator.
    async fn cancel_swap(&self, actor: Identity, swap_id: Uuid) -> Result<Swap, Error>;
}

/// Fixture implementation rejecting every mutation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSwapCommand;

#[async_trait]
impl SwapCommand for FixtureSwapCommand {
    async fn request_swap(&self, _payload: RequestSwapPayload) -> Result<Swap, Error> {
        Err(Error::service_unavailable("swap command not wired"))
    }

    async fn respond_to_swap(
        &self,
        _responder: UserId,
        _swap_id: Uuid,
        _action: SwapAction,
    ) -> Result<Swap, Error> {
        Err(Error::service_unavailable("swap command not wired"))
    }

    async fn cancel_swap(&self, _actor: Identity, _swap_id: Uuid) -> Result<Swap, Error> {
        Err(Error::service_unavailable("swap command not wired"))
    }
}
