//! GraphQL HTTP route handlers
//!
//! - `POST /graphql` - Execute a GraphQL document
//! - `GET /graphql/playground` - Interactive GraphQL playground

use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::Extension,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};

use crate::graphql::{QuillSchema, RequestLoaders};

/// Create the GraphQL router
pub fn graphql_router(schema: QuillSchema, loaders: RequestLoaders) -> Router {
    Router::new()
        .route("/", post(graphql_handler))
        .route("/playground", get(graphql_playground))
        .layer(Extension(schema))
        .layer(Extension(loaders))
}

/// Execute a GraphQL request against the schema
///
/// Each request receives its own batch resolvers. They are dropped together
/// with the request, so cached authors never leak into the next one.
async fn graphql_handler(
    Extension(schema): Extension<QuillSchema>,
    Extension(loaders): Extension<RequestLoaders>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let (request, stats) = loaders.attach(req.into_inner());
    let response = schema.execute(request).await;

    tracing::debug!(
        author_round_trips = stats.author_round_trips(),
        errors = response.errors.len(),
        "GraphQL request executed"
    );

    response.into()
}

/// GraphQL Playground handler for development
async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}
