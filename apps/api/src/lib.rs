//! Quill API library
//!
//! GraphQL service exposing authors, with a batched `author(id:)` lookup
//! backed by `quill-batch` and a direct `authorWithoutBatchLoader(id:)`
//! lookup for comparison. Exposed as a library for integration tests.

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod models;
pub mod repositories;
pub mod routes;

// Re-export commonly used types
pub use app::build_app;
pub use config::Config;
pub use error::{ApiError, ApiResult, ErrorResponse};
