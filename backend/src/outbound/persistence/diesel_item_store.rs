//! PostgreSQL-backed `ItemStore` implementation using Diesel ORM.
//!
//! The availability compare-and-set is a conditional `UPDATE ... WHERE
//! status = expected`; the affected-row count decides whether the transition
//! won.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ItemStore, ItemStoreError};
use crate::domain::{Item, ItemStatus, UserId};

use super::models::{ItemRow, NewItemRow};
use super::pool::{DbPool, PoolError};
use super::schema::items;

/// Diesel-backed implementation of the `ItemStore` port.
#[derive(Clone)]
pub struct DieselItemStore {
    pool: DbPool,
}

impl DieselItemStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain item store errors.
fn map_pool_error(error: PoolError) -> ItemStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ItemStoreError::connection(message)
        }
    }
}

/// Map Diesel errors to domain item store errors.
fn map_diesel_error(error: diesel::result::Error) -> ItemStoreError {
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
        DieselError::NotFound => ItemStoreError::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ItemStoreError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => ItemStoreError::query("database error"),
        _ => ItemStoreError::query("database error"),
    }
}

/// Convert a database row to a domain [`Item`].
fn row_to_item(row: ItemRow) -> Result<Item, ItemStoreError> {
    let status = ItemStatus::from_str(row.status.as_str())
        .map_err(|err| ItemStoreError::query(format!("corrupt status column: {err}")))?;

    Ok(Item {
        id: row.id,
        owner: UserId::from_uuid(row.owner_id),
        title: row.title,
        description: row.description,
        category: row.category,
        size: row.size,
        condition: row.condition,
        points_value: row.points_value,
        status,
        created_at: row.created_at,
    })
}

#[async_trait]
impl ItemStore for DieselItemStore {
    async fn insert(&self, item: &Item) -> Result<(), ItemStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewItemRow {
            id: item.id,
            owner_id: *item.owner.as_uuid(),
            title: item.title.as_str(),
            description: item.description.as_str(),
            category: item.category.as_str(),
            size: item.size.as_str(),
            condition: item.condition.as_str(),
            points_value: item.points_value,
            status: item.status.as_str(),
            created_at: item.created_at,
        };

        diesel::insert_into(items::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Item>, ItemStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ItemRow> = items::table
            .filter(items::id.eq(id))
            .select(ItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_item).transpose()
    }

    async fn list(&self) -> Result<Vec<Item>, ItemStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ItemRow> = items::table
            .order(items::created_at.desc())
            .select(ItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_item).collect()
    }

    async fn compare_and_set_status(
        &self,
        id: &Uuid,
        expected: ItemStatus,
        new: ItemStatus,
    ) -> Result<bool, ItemStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated_rows = diesel::update(
            items::table.filter(items::id.eq(id).and(items::status.eq(expected.as_str()))),
        )
        .set(items::status.eq(new.as_str()))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(updated_rows > 0)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, ItemStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted_rows = diesel::delete(items::table.filter(items::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted_rows > 0)
    }
}
