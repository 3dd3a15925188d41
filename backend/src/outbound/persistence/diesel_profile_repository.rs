//! PostgreSQL-backed `ProfileRepository` implementation.
//!
//! The one-to-one link is enforced by the unique `profiles.user_id` column;
//! its violations surface as `AlreadyExists`, and the foreign key surfaces
//! as `UserNotFound`.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{NewProfile, Profile, ProfileId, UserId};

use super::diesel_basic_error_mapping::{
    DieselFailure, classify_diesel_error, constraint_message, pool_error_message,
};
use super::models::{NewProfileRow, ProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::profiles;

/// Diesel-backed implementation of the `ProfileRepository` port.
#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselProfileRepository {
    /// Create a new repository with the given connection pool and clock.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> ProfileRepositoryError {
    ProfileRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, user_id: &UserId) -> ProfileRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => ProfileRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => ProfileRepositoryError::already_exists(*user_id),
        DieselFailure::ForeignKeyViolation { .. } => {
            ProfileRepositoryError::user_not_found(*user_id)
        }
        DieselFailure::CheckViolation { constraint } => ProfileRepositoryError::query(
            constraint_message("profile violates a column constraint", constraint.as_deref()),
        ),
        DieselFailure::Query(message) => ProfileRepositoryError::query(message),
    }
}

fn row_to_profile(row: ProfileRow) -> Profile {
    Profile {
        id: ProfileId(row.id),
        user_id: UserId::from_uuid(row.user_id),
        profile_image: row.profile_image,
        created_at: row.created_at,
    }
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn create(&self, profile: NewProfile) -> Result<Profile, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewProfileRow {
            user_id: *profile.user_id.as_uuid(),
            profile_image: profile.profile_image.as_deref(),
            created_at: self.clock.utc(),
        };

        diesel::insert_into(profiles::table)
            .values(&row)
            .returning(ProfileRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(row_to_profile)
            .map_err(|err| map_diesel_error(err, &profile.user_id))
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProfileRow> = profiles::table
            .filter(profiles::user_id.eq(user_id.as_uuid()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, user_id))?;
        Ok(row.map(row_to_profile))
    }
}
