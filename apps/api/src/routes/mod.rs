//! HTTP route handlers for the Quill API
//!
//! This module contains all endpoint handlers including:
//! - GraphQL execution and playground
//! - Health check and status endpoints

pub mod graphql;
pub mod health;

pub use graphql::graphql_router;
pub use health::{health_router, HealthState};
