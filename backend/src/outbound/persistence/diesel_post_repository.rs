//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{
    INITIAL_VERSION, NewPost, Post, PostChanges, PostContent, PostId, PostTitle, UserId,
};

use super::diesel_basic_error_mapping::{
    DieselFailure, classify_diesel_error, constraint_message, pool_error_message,
};
use super::diesel_helpers::{count_from_db, next_version, version_from_db, version_to_db};
use super::models::{NewPostRow, PostRow, PostUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::posts;

/// Diesel-backed implementation of the `PostRepository` port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool and clock.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> PostRepositoryError {
    PostRepositoryError::connection(pool_error_message(error))
}

/// Map Diesel errors, attributing foreign-key failures to `author_id`.
fn map_diesel_error(error: diesel::result::Error, author_id: Option<UserId>) -> PostRepositoryError {
    match (classify_diesel_error(error), author_id) {
        (DieselFailure::Connection(message), _) => PostRepositoryError::connection(message),
        (DieselFailure::ForeignKeyViolation { .. }, Some(author_id)) => {
            PostRepositoryError::author_not_found(author_id)
        }
        (DieselFailure::ForeignKeyViolation { constraint }, None) => PostRepositoryError::query(
            constraint_message("post reference rejected", constraint.as_deref()),
        ),
        (DieselFailure::CheckViolation { constraint }, _) => PostRepositoryError::validation(
            constraint_message("post violates a column constraint", constraint.as_deref()),
        ),
        (DieselFailure::UniqueViolation { constraint }, _) => PostRepositoryError::query(
            constraint_message("post identifier collision", constraint.as_deref()),
        ),
        (DieselFailure::Query(message), _) => PostRepositoryError::query(message),
    }
}

fn map_query_error(error: diesel::result::Error) -> PostRepositoryError {
    map_diesel_error(error, None)
}

/// Convert a database row into a domain post.
fn row_to_post(row: PostRow) -> Result<Post, PostRepositoryError> {
    let id = row.id;
    let invalid =
        |err: String| PostRepositoryError::query(format!("stored post {id} is invalid: {err}"));

    Ok(Post {
        id: PostId::new(row.id).map_err(|err| invalid(err.to_string()))?,
        author_id: UserId::from_uuid(row.author_id),
        title: PostTitle::new(row.title).map_err(|err| invalid(err.to_string()))?,
        content: PostContent::new(row.content).map_err(|err| invalid(err.to_string()))?,
        like_count: count_from_db(row.like_count).map_err(invalid)?,
        comment_count: count_from_db(row.comment_count).map_err(invalid)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
        version: version_from_db(row.version).map_err(invalid)?,
    })
}

/// Decide why a versioned update matched no row.
async fn update_failure<C>(conn: &mut C, id: &PostId, expected: u32) -> PostRepositoryError
where
    C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    let current = posts::table
        .filter(posts::id.eq(id.get()))
        .select(posts::version)
        .first::<i32>(conn)
        .await
        .optional();

    match current {
        Ok(Some(actual)) => match version_from_db(actual) {
            Ok(actual) => PostRepositoryError::version_conflict(expected, actual),
            Err(message) => PostRepositoryError::query(message),
        },
        Ok(None) => PostRepositoryError::not_found(*id),
        Err(err) => map_query_error(err),
    }
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = self.clock.utc();
        let row = NewPostRow {
            author_id: *post.author_id.as_uuid(),
            title: post.title.as_ref(),
            content: post.content.as_ref(),
            like_count: i64::from(post.like_count),
            comment_count: i64::from(post.comment_count),
            created_at: now,
            updated_at: now,
            version: version_to_db(INITIAL_VERSION).map_err(PostRepositoryError::query)?,
        };

        let stored = diesel::insert_into(posts::table)
            .values(&row)
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(post.author_id)))?;
        row_to_post(stored)
    }

    async fn find_all(&self) -> Result<Vec<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PostRow> = posts::table
            .order(posts::id.asc())
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_query_error)?;
        rows.into_iter().map(row_to_post).collect()
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PostRow> = posts::table
            .filter(posts::id.eq(id.get()))
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?;
        row.map(row_to_post).transpose()
    }

    async fn update(
        &self,
        id: &PostId,
        changes: PostChanges,
        expected_version: u32,
    ) -> Result<Post, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let expected_db = version_to_db(expected_version).map_err(PostRepositoryError::query)?;
        let changeset = PostUpdate {
            title: changes.title.as_ref().map(|title| title.as_ref()),
            content: changes.content.as_ref().map(|content| content.as_ref()),
            like_count: changes.like_count.map(i64::from),
            comment_count: changes.comment_count.map(i64::from),
            updated_at: self.clock.utc(),
            version: next_version(expected_version).map_err(PostRepositoryError::query)?,
        };

        let updated: Option<PostRow> = diesel::update(posts::table)
            .filter(posts::id.eq(id.get()).and(posts::version.eq(expected_db)))
            .set(&changeset)
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?;

        match updated {
            Some(row) => row_to_post(row),
            None => Err(update_failure(&mut conn, id, expected_version).await),
        }
    }

    async fn delete(&self, id: &PostId) -> Result<(), PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(posts::table.filter(posts::id.eq(id.get())))
            .execute(&mut conn)
            .await
            .map_err(map_query_error)?;
        if deleted == 0 {
            return Err(PostRepositoryError::not_found(*id));
        }
        Ok(())
    }
}
