//! Author queries for the Quill GraphQL API
//!
//! Two equivalent single-author lookups are exposed side by side:
//! - `author`: resolved through the request's batch resolver, so any number
//!   of aliased lookups in one document costs a single query
//! - `authorWithoutBatchLoader`: one query per field

use async_graphql::{Context, Object, Result, ID};

use crate::error::ApiError;
use crate::graphql::loaders::AuthorResolver;
use crate::graphql::types::Author;
use crate::models::validate_author_id;
use crate::repositories::AuthorRepository;

/// Author queries
#[derive(Default)]
pub struct AuthorQuery;

#[Object]
impl AuthorQuery {
    /// Get an author by ID (batched)
    async fn author(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Author>> {
        let resolver = ctx.data::<AuthorResolver>()?;
        let author = resolver
            .load(id.0)
            .await
            .map_err(|e| ApiError::from(e).into_graphql_error())?;
        Ok(author.map(Author::from))
    }

    /// Get an author by ID with a direct database lookup
    async fn author_without_batch_loader(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> Result<Option<Author>> {
        validate_author_id(&id)
            .map_err(|reason| ApiError::ValidationError(reason).into_graphql_error())?;

        let repo = ctx.data::<AuthorRepository>()?;
        let author = repo
            .find_by_id(&id)
            .await
            .map_err(|e| ApiError::from(e).into_graphql_error())?;
        Ok(author.map(Author::from))
    }

    /// List all authors
    async fn authors(&self, ctx: &Context<'_>) -> Result<Vec<Author>> {
        let repo = ctx.data::<AuthorRepository>()?;
        let authors = repo
            .find_all()
            .await
            .map_err(|e| ApiError::from(e).into_graphql_error())?;
        Ok(authors.into_iter().map(Author::from).collect())
    }
}
