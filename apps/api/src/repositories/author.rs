//! Author repository for centralized database operations
//!
//! This module provides all author-related database operations in a single
//! location, following the repository pattern. `find_many` is the bulk query
//! behind the batched GraphQL path; `find_by_id` serves the direct path.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use super::utils::{AUTHOR_COLUMNS, DEFAULT_AUTHOR_NAMES, FIND_MANY_CHUNK_SIZE};
use crate::error::{ApiError, ApiResult};
use crate::models::{Author, CreateAuthor};

/// Repository for author database operations
#[derive(Clone)]
pub struct AuthorRepository {
    pool: SqlitePool,
}

impl AuthorRepository {
    /// Create a new AuthorRepository instance
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find an author by their unique ID
    pub async fn find_by_id(&self, author_id: &str) -> Result<Option<Author>, sqlx::Error> {
        let sql = format!("SELECT {} FROM authors WHERE id = ?", AUTHOR_COLUMNS);
        sqlx::query_as::<_, Author>(&sql)
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Find every author whose ID is in `author_ids`
    ///
    /// Issues one query per [`FIND_MANY_CHUNK_SIZE`] IDs, so a single query
    /// for any batch up to that size. IDs with no matching row are simply
    /// absent from the result.
    pub async fn find_many(&self, author_ids: &[String]) -> Result<Vec<Author>, sqlx::Error> {
        let mut authors = Vec::new();
        // `chunks` yields nothing for empty input, so no invalid `IN ()` is built
        for chunk in author_ids.chunks(FIND_MANY_CHUNK_SIZE) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
                "SELECT {} FROM authors WHERE id IN (",
                AUTHOR_COLUMNS
            ));
            let mut ids = builder.separated(", ");
            for id in chunk {
                ids.push_bind(id.clone());
            }
            ids.push_unseparated(")");

            let found = builder.build_query_as::<Author>().fetch_all(&self.pool).await?;
            authors.extend(found);
        }
        Ok(authors)
    }

    /// Find all authors ordered by name
    pub async fn find_all(&self) -> Result<Vec<Author>, sqlx::Error> {
        let sql = format!("SELECT {} FROM authors ORDER BY name ASC, id ASC", AUTHOR_COLUMNS);
        sqlx::query_as::<_, Author>(&sql).fetch_all(&self.pool).await
    }

    /// Get total count of authors
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await
    }

    /// Insert a new author with a generated ID
    pub async fn create(&self, input: &CreateAuthor) -> ApiResult<Author> {
        let name = input
            .validated_name()
            .map_err(ApiError::ValidationError)?;

        let sql = format!(
            "INSERT INTO authors (id, name) VALUES (?, ?) RETURNING {}",
            AUTHOR_COLUMNS
        );
        let author = sqlx::query_as::<_, Author>(&sql)
            .bind(Uuid::new_v4().to_string())
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Ok(author)
    }

    /// Insert the default authors if the table is empty
    ///
    /// Returns the number of authors inserted.
    pub async fn seed_defaults(&self) -> ApiResult<usize> {
        let mut tx = self.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            tracing::debug!(existing = existing, "Authors table already populated, skipping seed");
            return Ok(0);
        }

        for name in DEFAULT_AUTHOR_NAMES {
            sqlx::query("INSERT INTO authors (id, name) VALUES (?, ?)")
                .bind(Uuid::new_v4().to_string())
                .bind(name)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        tracing::info!(count = DEFAULT_AUTHOR_NAMES.len(), "Seeded default authors");
        Ok(DEFAULT_AUTHOR_NAMES.len())
    }
}
