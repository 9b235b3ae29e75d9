//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{items, swaps, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub points: i64,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading credential material.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LoginRow {
    pub id: Uuid,
    pub is_admin: bool,
    pub salt: String,
    pub password_digest: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub display_name: &'a str,
    pub points: i64,
    pub is_admin: bool,
    pub salt: &'a str,
    pub password_digest: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the items table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItemRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub size: String,
    pub condition: String,
    pub points_value: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new item records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = items)]
pub(crate) struct NewItemRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub size: &'a str,
    pub condition: &'a str,
    pub points_value: i64,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the swaps table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = swaps)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SwapRow {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub recipient_id: Uuid,
    pub requested_item_id: Uuid,
    pub offered_item_id: Option<Uuid>,
    pub points_offered: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Insertable struct for creating new swap records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = swaps)]
pub(crate) struct NewSwapRow<'a> {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub recipient_id: Uuid,
    pub requested_item_id: Uuid,
    pub offered_item_id: Option<Uuid>,
    pub points_offered: i64,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}
