//! Flush scheduling for open batches
//!
//! A [`Scheduler`] decides *when* a batch is dispatched. The resolver hands it
//! a [`ScheduledFlush`] each time a new batch opens; running that flush
//! dispatches the batch if it is still waiting.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tracing::{trace, warn, Instrument};

/// Default delay used by [`TokioScheduler::default`]
pub const DEFAULT_FLUSH_DELAY: Duration = Duration::from_millis(1);

/// A deferred dispatch of one batch
///
/// Holds only a weak reference to its resolver: running it after the
/// resolver was dropped, or after the batch was already flushed, does nothing.
pub struct ScheduledFlush {
    batch_id: u64,
    run: Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>,
}

impl ScheduledFlush {
    pub(crate) fn new<F, Fut>(batch_id: u64, run: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            batch_id,
            run: Box::new(move || run().boxed()),
        }
    }

    /// Identifier of the batch this flush dispatches
    pub fn batch_id(&self) -> u64 {
        self.batch_id
    }

    /// Dispatch the batch and wait until all of its waiters are resolved
    pub async fn run(self) {
        (self.run)().await
    }
}

impl fmt::Debug for ScheduledFlush {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledFlush")
            .field("batch_id", &self.batch_id)
            .finish_non_exhaustive()
    }
}

/// Decides when open batches are flushed
pub trait Scheduler: Send + Sync + 'static {
    /// Arrange for `flush` to run at some later point
    ///
    /// Implementations must eventually run every flush they receive unless
    /// the surrounding request is cancelled first.
    fn schedule(&self, flush: ScheduledFlush);
}

/// Scheduler that never flushes on its own
///
/// The owner of the resolver calls [`BatchResolver::flush`](crate::BatchResolver::flush)
/// explicitly. Awaiting a handle before that will wait forever.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualScheduler;

impl Scheduler for ManualScheduler {
    fn schedule(&self, flush: ScheduledFlush) {
        trace!(batch_id = flush.batch_id(), "Batch awaiting explicit flush");
    }
}

/// Scheduler that flushes each batch from a spawned tokio task
///
/// The task first yields to the runtime (or sleeps `delay` when non-zero) so
/// that every resolver polled in the same tick can enqueue its key first.
#[derive(Debug, Clone, Copy)]
pub struct TokioScheduler {
    delay: Duration,
}

impl TokioScheduler {
    /// Create a scheduler that yields once before flushing, with no delay
    pub fn yielding() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    /// Create a scheduler that waits `delay` before flushing
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    /// Get the configured delay
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::with_delay(DEFAULT_FLUSH_DELAY)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, flush: ScheduledFlush) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(
                    batch_id = flush.batch_id(),
                    error = %e,
                    "No tokio runtime available, batch needs an explicit flush"
                );
                return;
            }
        };

        let delay = self.delay;
        handle.spawn(async move {
            if delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(delay).await;
            }
            flush.run().await;
        }
        .in_current_span());
    }
}
