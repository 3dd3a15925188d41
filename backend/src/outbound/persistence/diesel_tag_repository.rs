//! PostgreSQL-backed `TagRepository` implementation.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;

use crate::domain::ports::{TagRepository, TagRepositoryError};
use crate::domain::{NewTag, Tag, TagId, TagName};

use super::diesel_basic_error_mapping::{
    DieselFailure, classify_diesel_error, constraint_message, pool_error_message,
};
use super::models::{NewTagRow, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::tags;

/// Diesel-backed implementation of the `TagRepository` port.
#[derive(Clone)]
pub struct DieselTagRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselTagRepository {
    /// Create a new repository with the given connection pool and clock.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> TagRepositoryError {
    TagRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, name: Option<&TagName>) -> TagRepositoryError {
    match (classify_diesel_error(error), name) {
        (DieselFailure::Connection(message), _) => TagRepositoryError::connection(message),
        (DieselFailure::UniqueViolation { .. }, Some(name)) => {
            TagRepositoryError::duplicate_name(name.to_string())
        }
        (
            DieselFailure::UniqueViolation { constraint }
            | DieselFailure::ForeignKeyViolation { constraint }
            | DieselFailure::CheckViolation { constraint },
            _,
        ) => TagRepositoryError::query(constraint_message(
            "tag violates a constraint",
            constraint.as_deref(),
        )),
        (DieselFailure::Query(message), _) => TagRepositoryError::query(message),
    }
}

fn row_to_tag(row: TagRow) -> Result<Tag, TagRepositoryError> {
    let id = row.id;
    Ok(Tag {
        id: TagId(row.id),
        name: TagName::new(row.name)
            .map_err(|err| TagRepositoryError::query(format!("stored tag {id} is invalid: {err}")))?,
        created_at: row.created_at,
    })
}

#[async_trait]
impl TagRepository for DieselTagRepository {
    async fn create(&self, tag: NewTag) -> Result<Tag, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTagRow {
            name: tag.name.as_ref(),
            created_at: self.clock.utc(),
        };

        let stored = diesel::insert_into(tags::table)
            .values(&row)
            .returning(TagRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(&tag.name)))?;
        row_to_tag(stored)
    }

    async fn find_all(&self) -> Result<Vec<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .order(tags::id.asc())
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        rows.into_iter().map(row_to_tag).collect()
    }
}
