//! GraphQL schema and resolvers for Quill
//!
//! This module contains the async-graphql schema including:
//! - Query resolvers for authors (batched and direct)
//! - Type definitions for GraphQL objects
//! - Request-scoped batch loaders

pub mod loaders;
pub mod query;
pub mod schema;
pub mod types;

pub use loaders::{LoaderStats, RequestLoaders};
pub use schema::{build_schema, QuillSchema};
