//! Error types for batched key resolution

use std::sync::Arc;

use thiserror::Error;

/// Errors a caller of [`BatchResolver`](crate::BatchResolver) can observe
///
/// A key that was fetched but absent from the store's result is not an
/// error; it resolves to `Ok(None)`.
#[derive(Error, Debug)]
pub enum BatchError<E> {
    /// The key was rejected before joining any batch
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The batched fetch failed; every waiter of the batch shares this error
    #[error("store error: {0}")]
    Store(Arc<E>),

    /// The batch was discarded before it was dispatched
    #[error("batch cancelled before dispatch")]
    Cancelled,
}

impl<E> BatchError<E> {
    /// Check whether this error came from the underlying store
    pub fn is_store_error(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Access the underlying store error, if any
    pub fn store_error(&self) -> Option<&E> {
        match self {
            Self::Store(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

// Manual impl so `E` itself does not need to be `Clone`.
impl<E> Clone for BatchError<E> {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidKey(reason) => Self::InvalidKey(reason.clone()),
            Self::Store(err) => Self::Store(Arc::clone(err)),
            Self::Cancelled => Self::Cancelled,
        }
    }
}

/// Outcome of a single key lookup: a value, `None` for not found, or an error
pub type LoadResult<V, E> = Result<Option<V>, BatchError<E>>;
