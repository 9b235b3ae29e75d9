//! PostgreSQL-backed `UserStore` implementation using Diesel ORM.
//!
//! Balance adjustments are single conditional `UPDATE` statements: the
//! non-negativity check rides in the `WHERE` clause, so no read-modify-write
//! window exists.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{LoginRecord, NewUserRecord, UserStore, UserStoreError};
use crate::domain::{DisplayName, User, UserId, Username};

use super::models::{LoginRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserStore` port.
#[derive(Clone)]
pub struct DieselUserStore {
    pool: DbPool,
}

impl DieselUserStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain user store errors.
fn map_pool_error(error: PoolError) -> UserStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserStoreError::connection(message)
        }
    }
}

/// Map Diesel errors to domain user store errors.
fn map_diesel_error(error: diesel::result::Error) -> UserStoreError {
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
        DieselError::NotFound => UserStoreError::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserStoreError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => UserStoreError::query("database error"),
        _ => UserStoreError::query("database error"),
    }
}

/// Convert a database row to a domain [`User`].
fn row_to_user(row: UserRow) -> Result<User, UserStoreError> {
    let username = Username::new(row.username)
        .map_err(|err| UserStoreError::query(format!("corrupt username column: {err}")))?;
    let display_name = DisplayName::new(row.display_name)
        .map_err(|err| UserStoreError::query(format!("corrupt display_name column: {err}")))?;

    User::new(
        UserId::from_uuid(row.id),
        username,
        display_name,
        row.points,
        row.is_admin,
        row.created_at,
    )
    .map_err(|err| UserStoreError::query(format!("corrupt user row: {err}")))
}

fn row_to_login(row: LoginRow) -> LoginRecord {
    LoginRecord {
        user_id: UserId::from_uuid(row.id),
        is_admin: row.is_admin,
        salt: row.salt,
        password_digest: row.password_digest,
    }
}

#[async_trait]
impl UserStore for DieselUserStore {
    async fn insert(&self, record: &NewUserRecord) -> Result<(), UserStoreError> {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            id: *record.user.id().as_uuid(),
            username: record.user.username().as_ref(),
            display_name: record.user.display_name().as_ref(),
            points: record.user.points(),
            is_admin: record.user.is_admin(),
            salt: record.salt.as_str(),
            password_digest: record.password_digest.as_str(),
            created_at: record.user.created_at(),
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| match error {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    UserStoreError::duplicate_username(record.user.username().as_ref())
                }
                other => map_diesel_error(other),
            })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_login(&self, username: &str) -> Result<Option<LoginRecord>, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<LoginRow> = users::table
            .filter(users::username.eq(username))
            .select(LoginRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_login))
    }

    async fn adjust_balance(&self, id: &UserId, delta: i64) -> Result<i64, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Debits carry the non-negativity check in the WHERE clause so the
        // balance invariant holds under concurrent adjustments.
        let updated: Option<i64> = if delta < 0 {
            diesel::update(
                users::table.filter(users::id.eq(id.as_uuid()).and(users::points.ge(-delta))),
            )
            .set(users::points.eq(users::points + delta))
            .returning(users::points)
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        } else {
            diesel::update(users::table.filter(users::id.eq(id.as_uuid())))
                .set(users::points.eq(users::points + delta))
                .returning(users::points)
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?
        };

        if let Some(balance) = updated {
            return Ok(balance);
        }

        // No row matched: distinguish a missing user from a short balance.
        let exists: Option<i64> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(users::points)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match exists {
            Some(_) => Err(UserStoreError::insufficient_funds(-delta)),
            None => Err(UserStoreError::not_found()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let pool_err = PoolError::checkout("connection refused");
        let store_err = map_pool_error(pool_err);

        assert!(matches!(store_err, UserStoreError::Connection { .. }));
        assert!(store_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_not_found_maps_to_query_error() {
        let store_err = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(store_err, UserStoreError::Query { .. }));
        assert!(store_err.to_string().contains("record not found"));
    }

    #[rstest]
    fn row_to_user_rebuilds_the_domain_entity() {
        let row = UserRow {
            id: Uuid::new_v4(),
            username: "ada".to_owned(),
            display_name: "Ada Lovelace".to_owned(),
            points: 75,
            is_admin: true,
            created_at: Utc::now(),
        };

        let user = row_to_user(row).expect("valid row");
        assert_eq!(user.points(), 75);
        assert!(user.is_admin());
        assert_eq!(user.username().as_ref(), "ada");
    }

    #[rstest]
    fn row_to_user_rejects_corrupt_usernames() {
        let row = UserRow {
            id: Uuid::new_v4(),
            username: "Not A Handle".to_owned(),
            display_name: "Ada Lovelace".to_owned(),
            points: 0,
            is_admin: false,
            created_at: Utc::now(),
        };

        let err = row_to_user(row).expect_err("must fail");
        assert!(matches!(err, UserStoreError::Query { .. }));
    }

    #[rstest]
    fn login_rows_carry_the_admin_flag() {
        let id = Uuid::new_v4();
        let record = row_to_login(LoginRow {
            id,
            is_admin: true,
            salt: "ab".to_owned(),
            password_digest: "cd".to_owned(),
        });

        assert_eq!(record.user_id.as_uuid(), &id);
        assert!(record.is_admin);
    }
}
