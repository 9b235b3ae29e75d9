//! PostgreSQL-backed `SwapStore` implementation using Diesel ORM.
//!
//! The lifecycle transition is a conditional `UPDATE ... WHERE status =
//! from`: of two concurrent respond/cancel calls, exactly one sees an
//! affected row. Callers treat that row count as the authority on who won.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{SwapStore, SwapStoreError};
use crate::domain::{Swap, SwapStatus, UserId};

use super::models::{NewSwapRow, SwapRow};
use super::pool::{DbPool, PoolError};
use super::schema::swaps;

/// Diesel-backed implementation of the `SwapStore` port.
#[derive(Clone)]
pub struct DieselSwapStore {
    pool: DbPool,
}

impl DieselSwapStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain swap store errors.
fn map_pool_error(error: PoolError) -> SwapStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            SwapStoreError::connection(message)
        }
    }
}

/// Map Diesel errors to domain swap store errors.
fn map_diesel_error(error: diesel::result::Error) -> SwapStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => SwapStoreError::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            SwapStoreError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => SwapStoreError::query("database error"),
        _ => SwapStoreError::query("database error"),
    }
}

/// Convert a database row to a domain [`Swap`].
fn row_to_swap(row: SwapRow) -> Result<Swap, SwapStoreError> {
    let status = SwapStatus::from_str(row.status.as_str())
        .map_err(|err| SwapStoreError::query(format!("corrupt status column: {err}")))?;

    Ok(Swap {
        id: row.id,
        requester: UserId::from_uuid(row.requester_id),
        recipient: UserId::from_uuid(row.recipient_id),
        requested_item: row.requested_item_id,
        offered_item: row.offered_item_id,
        points_offered: row.points_offered,
        status,
        created_at: row.created_at,
        completed_at: row.completed_at,
    })
}

#[async_trait]
impl SwapStore for DieselSwapStore {
    async fn insert(&self, swap: &Swap) -> Result<(), SwapStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewSwapRow {
            id: swap.id,
            requester_id: *swap.requester.as_uuid(),
            recipient_id: *swap.recipient.as_uuid(),
            requested_item_id: swap.requested_item,
            offered_item_id: swap.offered_item,
            points_offered: swap.points_offered,
            status: swap.status.as_str(),
            created_at: swap.created_at,
        };

        diesel::insert_into(swaps::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Swap>, SwapStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<SwapRow> = swaps::table
            .filter(swaps::id.eq(id))
            .select(SwapRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_swap).transpose()
    }

    async fn transition(
        &self,
        id: &Uuid,
        from: SwapStatus,
        to: SwapStatus,
        completed_at: DateTime<Utc>,
    ) -> Result<bool, SwapStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated_rows = diesel::update(
            swaps::table.filter(swaps::id.eq(id).and(swaps::status.eq(from.as_str()))),
        )
        .set((
            swaps::status.eq(to.as_str()),
            swaps::completed_at.eq(Some(completed_at)),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(updated_rows > 0)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Swap>, SwapStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<SwapRow> = swaps::table
            .filter(
                swaps::requester_id
                    .eq(user_id.as_uuid())
                    .or(swaps::recipient_id.eq(user_id.as_uuid())),
            )
            .order(swaps::created_at.desc())
            .select(SwapRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_swap).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row_with_status(status: &str) -> SwapRow {
        SwapRow {
            id: Uuid::new_v4(),
            requester_id: Uuid::new_v4(),
            recipient_id: Uuid::new_v4(),
            requested_item_id: Uuid::new_v4(),
            offered_item_id: None,
            points_offered: 25,
            status: status.to_owned(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    #[rstest]
    #[case("pending", SwapStatus::Pending)]
    #[case("accepted", SwapStatus::Accepted)]
    #[case("rejected", SwapStatus::Rejected)]
    #[case("cancelled", SwapStatus::Cancelled)]
    fn row_to_swap_parses_status(#[case] raw: &str, #[case] expected: SwapStatus) {
        let swap = row_to_swap(row_with_status(raw)).expect("valid row");
        assert_eq!(swap.status, expected);
    }

    #[rstest]
    fn row_to_swap_rejects_unknown_status() {
        let err = row_to_swap(row_with_status("completed")).expect_err("must fail");
        assert!(matches!(err, SwapStoreError::Query { .. }));
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let store_err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(store_err, SwapStoreError::Connection { .. }));
    }
}
