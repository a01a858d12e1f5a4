//! Application router assembly

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::graphql::{build_schema, RequestLoaders};
use crate::repositories::AuthorRepository;
use crate::routes::{graphql_router, health_router, HealthState};

/// Build the full application router on top of a prepared pool
pub fn build_app(config: &Config, pool: SqlitePool) -> Router {
    let schema = build_schema(pool.clone());
    let loaders = RequestLoaders::new(AuthorRepository::new(pool.clone()), config.batch().clone());

    tracing::info!(
        cache_enabled = config.batch().cache_enabled,
        max_batch_size = config.batch().max_batch_size,
        flush_delay_ms = config.batch().flush_delay_ms,
        "Author batch resolver configured"
    );

    Router::new()
        .route("/", get(root))
        .nest("/graphql", graphql_router(schema, loaders))
        .nest("/health", health_router(HealthState::new(pool)))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(config))
}

/// Build the CORS layer based on configuration.
///
/// In production mode:
/// - If `CORS_ORIGINS` is set, only those origins are allowed
/// - If `CORS_ORIGINS` is not set, CORS requests are rejected
///
/// In development mode:
/// - If `CORS_ORIGINS` is set, those origins are used
/// - If `CORS_ORIGINS` is not set, permissive CORS is used
pub fn build_cors_layer(config: &Config) -> CorsLayer {
    match &config.cors_allowed_origins {
        Some(origins) if !origins.is_empty() => {
            let allowed_origins: Vec<_> = origins
                .iter()
                .filter_map(|origin| {
                    origin.parse().ok().or_else(|| {
                        tracing::warn!("Invalid CORS origin '{}', skipping", origin);
                        None
                    })
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::error!("No valid CORS origins configured, CORS requests will be rejected");
                return CorsLayer::new();
            }

            tracing::info!(
                "CORS configured with {} allowed origin(s): {:?}",
                allowed_origins.len(),
                origins
            );
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
                .max_age(std::time::Duration::from_secs(3600))
        }
        _ if config.is_production() => {
            tracing::warn!(
                "CORS_ORIGINS not configured in production mode. \
                 CORS requests will be rejected."
            );
            CorsLayer::new()
        }
        _ => {
            tracing::warn!("Using permissive CORS in development mode");
            CorsLayer::permissive()
        }
    }
}

async fn root() -> &'static str {
    "Quill GraphQL API - POST /graphql"
}
