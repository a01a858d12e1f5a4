//! Request-scoped loaders for GraphQL
//!
//! Every GraphQL request gets its own set of batch resolvers, built by
//! [`RequestLoaders::attach`] and dropped together with the request. Nothing
//! resolved for one request is visible to another.

mod author;

pub use author::{AuthorResolver, AuthorStore};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use quill_shared_config::BatchConfig;

use crate::config::{batch_options, batch_scheduler};
use crate::repositories::AuthorRepository;

/// Factory for the per-request resolvers
#[derive(Clone)]
pub struct RequestLoaders {
    repo: AuthorRepository,
    config: BatchConfig,
}

impl RequestLoaders {
    pub fn new(repo: AuthorRepository, config: BatchConfig) -> Self {
        Self { repo, config }
    }

    /// Build a fresh author resolver for one request
    pub fn author_resolver(&self) -> (AuthorResolver, LoaderStats) {
        let store = AuthorStore::new(self.repo.clone());
        let stats = LoaderStats {
            author_round_trips: store.round_trip_counter(),
        };
        let resolver = AuthorResolver::with_options(
            store,
            batch_scheduler(&self.config),
            batch_options(&self.config),
        );
        (resolver, stats)
    }

    /// Attach fresh resolvers to a GraphQL request
    pub fn attach(&self, request: async_graphql::Request) -> (async_graphql::Request, LoaderStats) {
        let (resolver, stats) = self.author_resolver();
        (request.data(resolver), stats)
    }
}

/// Counters observed after a request has executed
#[derive(Clone, Debug)]
pub struct LoaderStats {
    author_round_trips: Arc<AtomicUsize>,
}

impl LoaderStats {
    /// Number of author queries issued by the batched path
    pub fn author_round_trips(&self) -> usize {
        self.author_round_trips.load(Ordering::Relaxed)
    }
}
