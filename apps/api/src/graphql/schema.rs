//! GraphQL schema builder for Quill
//!
//! The schema holds the long-lived author repository. Batch
//! resolvers are request-scoped and attached per request, see
//! [`crate::graphql::loaders::RequestLoaders`].

use async_graphql::{EmptyMutation, EmptySubscription, Schema};
use sqlx::SqlitePool;

use crate::repositories::AuthorRepository;

use super::query::Query;

/// The Quill GraphQL schema type
pub type QuillSchema = Schema<Query, EmptyMutation, EmptySubscription>;

/// Create a new GraphQL schema backed by `pool`
pub fn build_schema(pool: SqlitePool) -> QuillSchema {
    Schema::build(Query::default(), EmptyMutation, EmptySubscription)
        .data(AuthorRepository::new(pool))
        .finish()
}
