//! Test helper functions for API integration tests

use async_graphql::{Request, Response};
use axum::{body::Body, http::Request as HttpRequest, Router};
use quill_api::graphql::{build_schema, LoaderStats, QuillSchema, RequestLoaders};
use quill_api::models::Author;
use quill_api::repositories::AuthorRepository;
use quill_api::{db, Config};
use quill_shared_config::{BatchConfig, CommonConfig, DatabaseConfig, Environment};
use sqlx::SqlitePool;

/// Seeded in-memory database
pub async fn seeded_pool() -> SqlitePool {
    db::prepare(&DatabaseConfig::with_url("sqlite::memory:"))
        .await
        .expect("in-memory database should prepare")
}

/// Migrated in-memory database without the default authors
pub async fn empty_pool() -> SqlitePool {
    let config = DatabaseConfig {
        seed: false,
        ..DatabaseConfig::with_url("sqlite::memory:")
    };
    db::prepare(&config)
        .await
        .expect("in-memory database should prepare")
}

/// Development configuration pointing at an in-memory database
pub fn test_config() -> Config {
    Config {
        common: CommonConfig {
            database: DatabaseConfig::with_url("sqlite::memory:"),
            batch: BatchConfig::default(),
            environment: Environment::Development,
            log_level: "debug".to_string(),
        },
        port: 0,
        cors_allowed_origins: None,
    }
}

/// Everything needed to execute GraphQL documents directly
pub struct TestGraphql {
    pub pool: SqlitePool,
    pub schema: QuillSchema,
    pub loaders: RequestLoaders,
}

impl TestGraphql {
    pub async fn new() -> Self {
        Self::with_batch_config(BatchConfig::default()).await
    }

    pub async fn with_batch_config(config: BatchConfig) -> Self {
        let pool = seeded_pool().await;
        Self {
            schema: build_schema(pool.clone()),
            loaders: RequestLoaders::new(AuthorRepository::new(pool.clone()), config),
            pool,
        }
    }

    /// Execute one document with fresh request-scoped resolvers
    pub async fn execute(&self, query: &str) -> (Response, LoaderStats) {
        let (request, stats) = self.loaders.attach(Request::new(query));
        let response = self.schema.execute(request).await;
        (response, stats)
    }

    /// Seeded authors ordered by name
    pub async fn authors(&self) -> Vec<Author> {
        AuthorRepository::new(self.pool.clone())
            .find_all()
            .await
            .expect("authors should load")
    }
}

/// Build a JSON GraphQL POST request
pub fn graphql_post(query: &str) -> HttpRequest<Body> {
    let body = serde_json::json!({ "query": query });
    HttpRequest::builder()
        .method("POST")
        .uri("/graphql")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

/// Read a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Full application over a seeded in-memory database
pub async fn test_app() -> (Router, SqlitePool) {
    let pool = seeded_pool().await;
    (quill_api::build_app(&test_config(), pool.clone()), pool)
}
