//! Author batch store for request-scoped resolution
//!
//! Binds the [`AuthorRepository`] bulk query to the batch resolver, so that
//! every `author(id:)` field evaluated within one GraphQL request is served
//! by a single `IN (...)` query.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use quill_batch::{BatchResolver, BatchStore};

use crate::models::{validate_author_id, Author};
use crate::repositories::AuthorRepository;

/// Request-scoped resolver for authors by ID
pub type AuthorResolver = BatchResolver<String, AuthorStore>;

/// Batch store fetching authors by ID
#[derive(Clone)]
pub struct AuthorStore {
    repo: AuthorRepository,
    round_trips: Arc<AtomicUsize>,
}

impl AuthorStore {
    pub fn new(repo: AuthorRepository) -> Self {
        Self {
            repo,
            round_trips: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of database queries issued through this store
    pub fn round_trips(&self) -> usize {
        self.round_trips.load(Ordering::Relaxed)
    }

    /// Shared handle to the round-trip counter
    pub fn round_trip_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.round_trips)
    }
}

impl BatchStore<String> for AuthorStore {
    type Value = Author;
    type Error = sqlx::Error;

    async fn fetch(&self, keys: &[String]) -> Result<HashMap<String, Author>, sqlx::Error> {
        self.round_trips.fetch_add(1, Ordering::Relaxed);
        let authors = self.repo.find_many(keys).await?;
        Ok(authors.into_iter().map(|a| (a.id.clone(), a)).collect())
    }

    fn validate_key(&self, key: &String) -> Result<(), String> {
        validate_author_id(key)
    }
}
