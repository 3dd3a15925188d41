//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Updates are guarded by the `version` column: the `UPDATE` filters on the
//! expected version and, when no row matches, a follow-up read decides
//! between a version conflict and a missing user.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{
    Email, INITIAL_VERSION, NewUser, Nickname, PasswordHash, User, UserChanges, UserId,
};

use super::diesel_basic_error_mapping::{
    DieselFailure, classify_diesel_error, constraint_message, pool_error_message,
};
use super::diesel_helpers::{next_version, version_from_db, version_to_db};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool and clock.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => UserRepositoryError::connection(message),
        DieselFailure::CheckViolation { constraint } => UserRepositoryError::validation(
            constraint_message("user violates a column constraint", constraint.as_deref()),
        ),
        DieselFailure::UniqueViolation { constraint } => UserRepositoryError::query(
            constraint_message("user identifier collision", constraint.as_deref()),
        ),
        DieselFailure::ForeignKeyViolation { constraint } => UserRepositoryError::query(
            constraint_message("user reference rejected", constraint.as_deref()),
        ),
        DieselFailure::Query(message) => UserRepositoryError::query(message),
    }
}

/// Convert a database row into a domain user.
fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let id = row.id;
    let invalid =
        |err: String| UserRepositoryError::query(format!("stored user {id} is invalid: {err}"));

    Ok(User {
        id: UserId::from_uuid(row.id),
        additional_id: row.additional_id,
        nickname: Nickname::new(row.nickname).map_err(|err| invalid(err.to_string()))?,
        email: Email::new(row.email).map_err(|err| invalid(err.to_string()))?,
        password_hash: PasswordHash::parse(&row.password_hash)
            .map_err(|err| invalid(err.to_string()))?,
        created_at: row.created_at,
        updated_at: row.updated_at,
        version: version_from_db(row.version).map_err(invalid)?,
    })
}

/// Decide why a versioned update matched no row.
async fn update_failure<C>(conn: &mut C, id: &UserId, expected: u32) -> UserRepositoryError
where
    C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    let current = users::table
        .filter(users::id.eq(id.as_uuid()))
        .select(users::version)
        .first::<i32>(conn)
        .await
        .optional();

    match current {
        Ok(Some(actual)) => match version_from_db(actual) {
            Ok(actual) => UserRepositoryError::version_conflict(expected, actual),
            Err(message) => UserRepositoryError::query(message),
        },
        Ok(None) => UserRepositoryError::not_found(*id),
        Err(err) => map_diesel_error(err),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = self.clock.utc();
        let password_hash = user.password_hash.encode();
        let row = NewUserRow {
            id: Uuid::new_v4(),
            nickname: user.nickname.as_ref(),
            email: user.email.as_ref(),
            password_hash: &password_hash,
            created_at: now,
            updated_at: now,
            version: version_to_db(INITIAL_VERSION).map_err(UserRepositoryError::query)?,
        };

        let stored = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_user(stored)
    }

    async fn find_all(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order(users::additional_id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_user).collect()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
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

    async fn update(
        &self,
        id: &UserId,
        changes: UserChanges,
        expected_version: u32,
    ) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let expected_db = version_to_db(expected_version).map_err(UserRepositoryError::query)?;
        let changeset = UserUpdate {
            nickname: changes.nickname.as_ref().map(|nickname| nickname.as_ref()),
            email: changes.email.as_ref().map(|email| email.as_ref()),
            updated_at: self.clock.utc(),
            version: next_version(expected_version).map_err(UserRepositoryError::query)?,
        };

        let updated: Option<UserRow> = diesel::update(users::table)
            .filter(
                users::id
                    .eq(id.as_uuid())
                    .and(users::version.eq(expected_db)),
            )
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match updated {
            Some(row) => row_to_user(row),
            None => Err(update_failure(&mut conn, id, expected_version).await),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Profiles and posts go with the user via ON DELETE CASCADE.
        let deleted = diesel::delete(users::table.filter(users::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if deleted == 0 {
            return Err(UserRepositoryError::not_found(*id));
        }
        Ok(())
    }
}
