//! The bulk-fetch capability a resolver batches against

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;

/// Bounds every batch key must satisfy
pub trait BatchKey: Send + Sync + Hash + Eq + Clone + 'static {}

impl<T> BatchKey for T where T: Send + Sync + Hash + Eq + Clone + 'static {}

/// A key-addressed store that can fetch many keys in one call
///
/// `fetch` receives each distinct key of a batch exactly once and may return
/// a partial map: keys with no matching record are simply left out.
pub trait BatchStore<K: BatchKey>: Send + Sync + 'static {
    /// Type of value
    type Value: Send + Sync + Clone + 'static;

    /// Type of error
    type Error: Display + Send + Sync + 'static;

    /// Load the values for `keys`
    fn fetch(
        &self,
        keys: &[K],
    ) -> impl Future<Output = Result<HashMap<K, Self::Value>, Self::Error>> + Send;

    /// Reject malformed keys before they join a batch
    fn validate_key(&self, _key: &K) -> Result<(), String> {
        Ok(())
    }
}
