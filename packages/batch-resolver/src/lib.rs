//! Request-scoped batched key resolution for Quill
//!
//! This crate provides a "data loader": independent resolvers running within
//! one logical request ask for single keys, and the [`BatchResolver`]
//! coalesces those lookups into as few bulk fetches as possible.
//!
//! - [`BatchStore`] - the bulk-fetch capability (e.g. one `IN (...)` query)
//! - [`Scheduler`] - decides when an open batch is flushed
//! - [`BatchResolver`] - deduplicates, batches, and fans results back out
//!
//! # Guarantees
//!
//! - A key appears at most once in any fetch call
//! - Every handle resolves exactly once: to a value, to `None` (not found),
//!   or to a [`BatchError`]
//! - A failed fetch hands the same error to every waiter of that batch
//! - Resolvers are never shared between requests; each carries its own cache
//!
//! # Example
//!
//! ```rust,ignore
//! use quill_batch::{BatchResolver, TokioScheduler};
//!
//! // One resolver per logical request
//! let resolver = BatchResolver::new(AuthorStore::new(repo), TokioScheduler::default());
//!
//! let (a, b) = tokio::join!(resolver.load(id_a), resolver.load(id_b));
//! // Both lookups were served by a single fetch call
//! ```

mod error;
mod resolver;
mod scheduler;
mod store;

pub use error::{BatchError, LoadResult};
pub use resolver::{BatchOptions, BatchResolver, PendingLoad};
pub use scheduler::{ManualScheduler, ScheduledFlush, Scheduler, TokioScheduler, DEFAULT_FLUSH_DELAY};
pub use store::{BatchKey, BatchStore};
