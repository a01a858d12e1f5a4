//! GraphQL queries for Quill
//!
//! This module contains all query resolvers, organized by domain.

mod author;

pub use author::AuthorQuery;

use async_graphql::MergedObject;

/// Root query type combining all query domains
#[derive(MergedObject, Default)]
pub struct Query(AuthorQuery);
