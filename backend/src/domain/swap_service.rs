//! Swap coordinator domain service.
//!
//! This module implements the driving ports for the swap workflow. Every
//! mutation commits through a conditional store update: item reservations at
//! request time and swap lifecycle transitions at respond/cancel time. The
//! conditional update is the sole source of truth for which of two racing
//! callers succeeded; precondition reads are optimistic pre-filters only.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{
    ItemStore, ItemStoreError, ItemSummary, RequestSwapPayload, SwapCommand, SwapQuery, SwapStore,
    SwapStoreError, SwapView, UserStore, UserStoreError, UserSummary,
};
use crate::domain::{
    Error, Identity, Item, ItemStatus, Swap, SwapAction, SwapDraft, SwapStatus, UserId,
};

/// Swap coordinator implementing the driving ports.
#[derive(Clone)]
pub struct SwapService<I, U, S> {
    items: Arc<I>,
    users: Arc<U>,
    swaps: Arc<S>,
}

impl<I, U, S> SwapService<I, U, S> {
    /// Create a new service over the given stores.
    pub fn new(items: Arc<I>, users: Arc<U>, swaps: Arc<S>) -> Self {
        Self {
            items,
            users,
            swaps,
        }
    }
}

impl<I, U, S> SwapService<I, U, S>
where
    I: ItemStore,
    U: UserStore,
    S: SwapStore,
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

    fn map_user_error(error: UserStoreError) -> Error {
        match error {
            UserStoreError::Connection { message } => {
                Error::service_unavailable(format!("user store unavailable: {message}"))
            }
            UserStoreError::Query { message } => {
                Error::internal(format!("user store error: {message}"))
            }
            UserStoreError::NotFound => Error::internal("user account missing"),
            UserStoreError::DuplicateUsername { username } => {
                Error::internal(format!("unexpected username conflict: {username}"))
            }
            UserStoreError::InsufficientFunds { .. } => {
                Error::insufficient_points("Not enough points")
            }
        }
    }

    fn map_swap_error(error: SwapStoreError) -> Error {
        match error {
            SwapStoreError::Connection { message } => {
                Error::service_unavailable(format!("swap store unavailable: {message}"))
            }
            SwapStoreError::Query { message } => {
                Error::internal(format!("swap store error: {message}"))
            }
        }
    }

    async fn load_swap(&self, swap_id: &Uuid) -> Result<Swap, Error> {
        self.swaps
            .find_by_id(swap_id)
            .await
            .map_err(Self::map_swap_error)?
            .ok_or_else(|| Error::swap_not_found("Swap not found"))
    }

    async fn load_available_item(&self, item_id: &Uuid, role: &str) -> Result<Item, Error> {
        let item = self
            .items
            .find_by_id(item_id)
            .await
            .map_err(Self::map_item_error)?
            .ok_or_else(|| Error::item_unavailable(format!("{role} not available for swap")))?;
        if !item.is_available() {
            return Err(Error::item_unavailable(format!(
                "{role} not available for swap"
            )));
        }
        Ok(item)
    }

    /// Move an item alongside a won swap transition, warning when the stored
    /// status no longer matches what this swap reserved.
    async fn mark_item(
        &self,
        item_id: &Uuid,
        expected: ItemStatus,
        new: ItemStatus,
    ) -> Result<(), Error> {
        let moved = self
            .items
            .compare_and_set_status(item_id, expected, new)
            .await
            .map_err(Self::map_item_error)?;
        if !moved {
            warn!(item_id = %item_id, from = %expected, to = %new,
                "item status did not match the swap transition");
        }
        Ok(())
    }

    /// Best-effort release of a reservation taken earlier in a failed
    /// request; failures are logged rather than masking the original error.
    async fn try_release(&self, item_id: &Uuid) {
        match self
            .items
            .compare_and_set_status(item_id, ItemStatus::Pending, ItemStatus::Available)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                warn!(item_id = %item_id, "item was not pending while releasing a reservation");
            }
            Err(error) => {
                warn!(item_id = %item_id, error = %error, "failed to release item reservation");
            }
        }
    }

    async fn accept(&self, swap: Swap, now: DateTime<Utc>) -> Result<Swap, Error> {
        let points = swap.points_offered;

        // Debit first: the conditional update re-validates the balance, so a
        // requester who spent points since the request fails here, before the
        // swap leaves `pending`.
        if points > 0 {
            self.users
                .adjust_balance(&swap.requester, -points)
                .await
                .map_err(Self::map_user_error)?;
        }

        let advanced = self
            .swaps
            .transition(&swap.id, SwapStatus::Pending, SwapStatus::Accepted, now)
            .await
            .map_err(Self::map_swap_error)?;
        if !advanced {
            if points > 0 {
                if let Err(error) = self.users.adjust_balance(&swap.requester, points).await {
                    tracing::error!(swap_id = %swap.id, error = %error,
                        "failed to refund points after a lost swap transition");
                    return Err(Error::internal(
                        "points refund failed after concurrent update",
                    ));
                }
            }
            return Err(Error::swap_already_processed("Swap already processed"));
        }

        if points > 0 {
            if let Err(error) = self.users.adjust_balance(&swap.recipient, points).await {
                tracing::error!(swap_id = %swap.id, error = %error,
                    "failed to credit recipient after acceptance");
                return Err(Self::map_user_error(error));
            }
        }

        self.mark_item(&swap.requested_item, ItemStatus::Pending, ItemStatus::Swapped)
            .await?;
        if let Some(offered) = swap.offered_item {
            self.mark_item(&offered, ItemStatus::Pending, ItemStatus::Swapped)
                .await?;
        }

        Ok(swap.into_resolved(SwapStatus::Accepted, now))
    }

    /// Shared path for reject and cancel: win the terminal transition, then
    /// put both reserved items back on the market.
    async fn resolve_and_release(
        &self,
        swap: Swap,
        status: SwapStatus,
        now: DateTime<Utc>,
    ) -> Result<Swap, Error> {
        let advanced = self
            .swaps
            .transition(&swap.id, SwapStatus::Pending, status, now)
            .await
            .map_err(Self::map_swap_error)?;
        if !advanced {
            return Err(Error::swap_already_processed("Swap already processed"));
        }

        self.mark_item(
            &swap.requested_item,
            ItemStatus::Pending,
            ItemStatus::Available,
        )
        .await?;
        if let Some(offered) = swap.offered_item {
            self.mark_item(&offered, ItemStatus::Pending, ItemStatus::Available)
                .await?;
        }

        Ok(swap.into_resolved(status, now))
    }

    async fn user_summary(&self, user_id: &UserId) -> Result<Option<UserSummary>, Error> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_user_error)?;
        Ok(user.map(|user| UserSummary {
            id: user.id().clone(),
            display_name: user.display_name().clone(),
        }))
    }

    async fn item_summary(&self, item_id: &Uuid) -> Result<Option<ItemSummary>, Error> {
        let item = self
            .items
            .find_by_id(item_id)
            .await
            .map_err(Self::map_item_error)?;
        Ok(item.map(|item| ItemSummary {
            id: item.id,
            title: item.title,
            status: item.status,
            points_value: item.points_value,
        }))
    }

    async fn resolve_view(&self, swap: Swap) -> Result<SwapView, Error> {
        let requester_summary = self.user_summary(&swap.requester).await?;
        let recipient_summary = self.user_summary(&swap.recipient).await?;
        let requested_item_summary = self.item_summary(&swap.requested_item).await?;
        let offered_item_summary = match swap.offered_item.as_ref() {
            Some(offered) => self.item_summary(offered).await?,
            None => None,
        };

        Ok(SwapView {
            swap,
            requester_summary,
            recipient_summary,
            requested_item_summary,
            offered_item_summary,
        })
    }
}

#[async_trait]
impl<I, U, S> SwapCommand for SwapService<I, U, S>
where
    I: ItemStore,
    U: UserStore,
    S: SwapStore,
{
    async fn request_swap(&self, payload: RequestSwapPayload) -> Result<Swap, Error> {
        if payload.points_offered < 0 {
            return Err(Error::invalid_request("points offered must not be negative"));
        }

        let requested = self
            .load_available_item(&payload.requested_item, "Item")
            .await?;
        if requested.owner == payload.requester {
            return Err(Error::self_swap_forbidden("Cannot request your own item"));
        }

        // Optimistic pre-filter only: the balance is re-validated inside the
        // debit when the swap is accepted.
        if payload.points_offered > 0 {
            let requester = self
                .users
                .find_by_id(&payload.requester)
                .await
                .map_err(Self::map_user_error)?
                .ok_or_else(|| Error::internal("requester account missing"))?;
            if requester.points() < payload.points_offered {
                return Err(Error::insufficient_points("Not enough points"));
            }
        }

        if let Some(offered_id) = payload.offered_item.as_ref() {
            let offered = self.load_available_item(offered_id, "Offered item").await?;
            if offered.owner != payload.requester {
                return Err(Error::not_item_owner("Not your item to offer"));
            }
        }

        let swap = Swap::open(SwapDraft {
            id: Uuid::new_v4(),
            requester: payload.requester,
            recipient: requested.owner,
            requested_item: payload.requested_item,
            offered_item: payload.offered_item,
            points_offered: payload.points_offered,
            created_at: Utc::now(),
        })
        .map_err(|error| Error::invalid_request(error.to_string()))?;

        // Reservation commit: only a transition from exactly `available`
        // succeeds, so two concurrent requests cannot both reserve the item.
        let reserved = self
            .items
            .compare_and_set_status(
                &swap.requested_item,
                ItemStatus::Available,
                ItemStatus::Pending,
            )
            .await
            .map_err(Self::map_item_error)?;
        if !reserved {
            return Err(Error::item_unavailable("Item not available for swap"));
        }

        if let Some(offered_id) = swap.offered_item.as_ref() {
            let reserved = self
                .items
                .compare_and_set_status(offered_id, ItemStatus::Available, ItemStatus::Pending)
                .await
                .map_err(Self::map_item_error)?;
            if !reserved {
                self.try_release(&swap.requested_item).await;
                return Err(Error::item_unavailable("Offered item not available"));
            }
        }

        if let Err(error) = self.swaps.insert(&swap).await {
            self.try_release(&swap.requested_item).await;
            if let Some(offered_id) = swap.offered_item.as_ref() {
                self.try_release(offered_id).await;
            }
            return Err(Self::map_swap_error(error));
        }

        Ok(swap)
    }

    async fn respond_to_swap(
        &self,
        responder: UserId,
        swap_id: Uuid,
        action: SwapAction,
    ) -> Result<Swap, Error> {
        let swap = self.load_swap(&swap_id).await?;

        if swap.recipient != responder {
            return Err(Error::not_authorized("Not authorized"));
        }
        if swap.status.is_terminal() {
            return Err(Error::swap_already_processed("Swap already processed"));
        }

        let now = Utc::now();
        match action {
            SwapAction::Accept => self.accept(swap, now).await,
            SwapAction::Reject => {
                self.resolve_and_release(swap, SwapStatus::Rejected, now)
                    .await
            }
        }
    }

    async fn cancel_swap(&self, actor: Identity, swap_id: Uuid) -> Result<Swap, Error> {
        let swap = self.load_swap(&swap_id).await?;

        if !actor.can_cancel(&swap) {
            return Err(Error::not_authorized("Not authorized"));
        }
        if swap.status.is_terminal() {
            return Err(Error::swap_already_processed("Swap already processed"));
        }

        self.resolve_and_release(swap, SwapStatus::Cancelled, Utc::now())
            .await
    }
}

#[async_trait]
impl<I, U, S> SwapQuery for SwapService<I, U, S>
where
    I: ItemStore,
    U: UserStore,
    S: SwapStore,
{
    async fn list_swaps(&self, user_id: UserId) -> Result<Vec<SwapView>, Error> {
        let swaps = self
            .swaps
            .list_for_user(&user_id)
            .await
            .map_err(Self::map_swap_error)?;

        let mut views = Vec::with_capacity(swaps.len());
        for swap in swaps {
            views.push(self.resolve_view(swap).await?);
        }
        Ok(views)
    }
}
