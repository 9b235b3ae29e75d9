//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation.

diesel::table! {
    /// User accounts with point balances and credential material.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login handle.
        username -> Varchar,
        /// Human-readable display name (max 32 characters).
        display_name -> Varchar,
        /// Point balance; kept non-negative by conditional updates.
        points -> Int8,
        /// Administrator capability flag.
        is_admin -> Bool,
        /// Per-user random salt for the password digest.
        salt -> Varchar,
        /// Hex-encoded salted SHA-256 password digest.
        password_digest -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Listed items with their availability status.
    items (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user.
        owner_id -> Uuid,
        title -> Varchar,
        description -> Text,
        category -> Varchar,
        size -> Varchar,
        condition -> Varchar,
        /// Suggested exchange value in points.
        points_value -> Int8,
        /// One of `available`, `pending`, `swapped`.
        status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Swap proposals and their lifecycle state.
    swaps (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// User who opened the swap.
        requester_id -> Uuid,
        /// Owner of the requested item at creation time.
        recipient_id -> Uuid,
        requested_item_id -> Uuid,
        offered_item_id -> Nullable<Uuid>,
        points_offered -> Int8,
        /// One of `pending`, `accepted`, `rejected`, `cancelled`.
        status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Set when the swap leaves `pending`.
        completed_at -> Nullable<Timestamptz>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, items, swaps);
