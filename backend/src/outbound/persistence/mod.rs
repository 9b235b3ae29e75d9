//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain store ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: store implementations only translate between Diesel
//!   rows and domain types. No business logic resides here; in particular,
//!   every compare-and-set is a single conditional `UPDATE` whose
//!   affected-row count is returned to the coordinator untouched.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are implementation details, never exposed to
//!   the domain layer.
//! - **Strongly typed errors**: all database errors are mapped to the port
//!   error types.

mod diesel_item_store;
mod diesel_swap_store;
mod diesel_user_store;
mod models;
mod pool;
mod schema;

pub use diesel_item_store::DieselItemStore;
pub use diesel_swap_store::DieselSwapStore;
pub use diesel_user_store::DieselUserStore;
pub use pool::{DbPool, PoolConfig, PoolError};
