//! Request-scoped batch resolver
//!
//! [`BatchResolver`] collects individual key lookups into batches, dispatches
//! each batch as one call to a [`BatchStore`], and fans the results back out
//! to every caller. One resolver belongs to exactly one logical request.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use futures_util::future::join_all;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn, Instrument};

use crate::error::{BatchError, LoadResult};
use crate::scheduler::{ScheduledFlush, Scheduler};
use crate::store::{BatchKey, BatchStore};

/// Tuning knobs for a [`BatchResolver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Keep resolved values for the lifetime of the resolver
    pub caching: bool,

    /// Maximum number of distinct keys per fetch (`None` = unbounded)
    pub max_batch_size: Option<usize>,
}

impl BatchOptions {
    /// Create the default options (caching on, unbounded batches)
    pub fn new() -> Self {
        Self {
            caching: true,
            max_batch_size: None,
        }
    }

    /// Enable or disable the per-resolver value cache
    pub fn caching(mut self, enabled: bool) -> Self {
        self.caching = enabled;
        self
    }

    /// Limit the number of distinct keys per fetch; `0` means unbounded
    pub fn max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = (max > 0).then_some(max);
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::new()
    }
}

type Waiter<V, E> = oneshot::Sender<LoadResult<V, E>>;

/// Keys collected since the last dispatch, with everyone waiting on them
struct Batch<K, V, E> {
    id: u64,
    keys: Vec<K>,
    waiters: HashMap<K, Vec<Waiter<V, E>>>,
}

impl<K: BatchKey, V: Clone, E> Batch<K, V, E> {
    fn new(id: u64) -> Self {
        Self {
            id,
            keys: Vec::new(),
            waiters: HashMap::new(),
        }
    }

    fn contains(&self, key: &K) -> bool {
        self.waiters.contains_key(key)
    }

    fn is_full(&self, max_batch_size: Option<usize>) -> bool {
        max_batch_size.is_some_and(|max| self.keys.len() >= max)
    }

    fn attach(&mut self, key: K, waiter: Waiter<V, E>) {
        match self.waiters.entry(key) {
            Entry::Occupied(entry) => entry.into_mut().push(waiter),
            Entry::Vacant(entry) => {
                self.keys.push(entry.key().clone());
                entry.insert(vec![waiter]);
            }
        }
    }

    fn waiter_count(&self) -> usize {
        self.waiters.values().map(Vec::len).sum()
    }

    /// Resolve every waiter from the fetched values; returns the number of keys not found
    fn resolve(self, mut values: HashMap<K, V>) -> usize {
        let mut missing = 0;
        for (key, waiters) in self.waiters {
            let value = values.remove(&key);
            if value.is_none() {
                missing += 1;
            }
            fan_out(waiters, Ok(value));
        }
        missing
    }

    fn fail(self, err: Arc<E>) {
        for (_, waiters) in self.waiters {
            fan_out(waiters, Err(BatchError::Store(Arc::clone(&err))));
        }
    }
}

fn fan_out<V: Clone, E>(waiters: Vec<Waiter<V, E>>, outcome: LoadResult<V, E>) {
    for waiter in waiters {
        // The receiver may have been dropped; the batch still completes.
        let _ = waiter.send(outcome.clone());
    }
}

struct State<K, V, E> {
    next_batch_id: u64,
    /// Undispatched batches; only the back one may still accept new keys
    queued: VecDeque<Batch<K, V, E>>,
    cache: HashMap<K, V>,
}

impl<K: BatchKey, V: Clone, E> State<K, V, E> {
    fn new() -> Self {
        Self {
            next_batch_id: 0,
            queued: VecDeque::new(),
            cache: HashMap::new(),
        }
    }

    /// Add a waiter for `key`; returns the id of a newly opened batch, if any
    fn enqueue(&mut self, key: K, waiter: Waiter<V, E>, max_batch_size: Option<usize>) -> Option<u64> {
        if let Some(batch) = self.queued.iter_mut().find(|batch| batch.contains(&key)) {
            trace!(batch_id = batch.id, "Key already queued, sharing fetch");
            batch.attach(key, waiter);
            return None;
        }

        let opened = match self.queued.back() {
            Some(batch) if !batch.is_full(max_batch_size) => None,
            _ => {
                let id = self.next_batch_id;
                self.next_batch_id += 1;
                self.queued.push_back(Batch::new(id));
                trace!(batch_id = id, "Opened batch");
                Some(id)
            }
        };

        if let Some(batch) = self.queued.back_mut() {
            batch.attach(key, waiter);
        }
        opened
    }

    fn take_batch(&mut self, batch_id: u64) -> Option<Batch<K, V, E>> {
        let index = self.queued.iter().position(|batch| batch.id == batch_id)?;
        self.queued.remove(index)
    }
}

struct Shared<K: BatchKey, S: BatchStore<K>> {
    store: Arc<S>,
    scheduler: Box<dyn Scheduler>,
    options: BatchOptions,
    state: Mutex<State<K, S::Value, S::Error>>,
}

/// Deduplicating, batching key resolver scoped to one logical request
///
/// Create one at the start of a request and drop it at the end. Dropping it
/// cancels batches that were never dispatched; batches already in flight run
/// to completion.
///
/// # Example
///
/// ```rust,ignore
/// let resolver = BatchResolver::new(AuthorStore::new(repo), ManualScheduler);
/// let first = resolver.request("a".to_string());
/// let second = resolver.request("a".to_string());
/// resolver.flush().await; // one fetch with ["a"]
/// assert_eq!(first.await?, second.await?);
/// ```
pub struct BatchResolver<K: BatchKey, S: BatchStore<K>> {
    shared: Arc<Shared<K, S>>,
}

impl<K: BatchKey, S: BatchStore<K>> BatchResolver<K, S> {
    /// Create a resolver with default options
    pub fn new(store: S, scheduler: impl Scheduler) -> Self {
        Self::with_options(store, scheduler, BatchOptions::default())
    }

    /// Create a resolver with explicit options
    pub fn with_options(store: S, scheduler: impl Scheduler, options: BatchOptions) -> Self {
        Self {
            shared: Arc::new(Shared {
                store: Arc::new(store),
                scheduler: Box::new(scheduler),
                options,
                state: Mutex::new(State::new()),
            }),
        }
    }

    /// Get the resolver options
    pub fn options(&self) -> BatchOptions {
        self.shared.options
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.shared.store
    }

    /// Register interest in `key` and return a handle to its outcome
    ///
    /// Never blocks. Invalid keys and cached values produce a handle that is
    /// ready immediately; otherwise the handle resolves once the batch that
    /// holds `key` has been dispatched.
    pub fn request(&self, key: K) -> PendingLoad<S::Value, S::Error> {
        if let Err(reason) = self.shared.store.validate_key(&key) {
            debug!(reason = %reason, "Rejected invalid key");
            return PendingLoad::ready(Err(BatchError::InvalidKey(reason)));
        }

        let (tx, rx) = oneshot::channel();
        let opened = {
            let mut state = self.shared.state.lock();
            if self.shared.options.caching {
                if let Some(value) = state.cache.get(&key) {
                    trace!("Key served from request cache");
                    return PendingLoad::ready(Ok(Some(value.clone())));
                }
            }
            state.enqueue(key, tx, self.shared.options.max_batch_size)
        };

        if let Some(batch_id) = opened {
            self.schedule(batch_id);
        }
        PendingLoad::waiting(rx)
    }

    /// Request `key` and wait for its outcome
    pub async fn load(&self, key: K) -> LoadResult<S::Value, S::Error> {
        self.request(key).await
    }

    /// Request several keys and collect the ones that were found
    ///
    /// Fails with the first error encountered.
    pub async fn load_many(
        &self,
        keys: impl IntoIterator<Item = K>,
    ) -> Result<HashMap<K, S::Value>, BatchError<S::Error>> {
        let pending: Vec<_> = keys
            .into_iter()
            .map(|key| {
                let handle = self.request(key.clone());
                async move { (key, handle.await) }
            })
            .collect();

        let mut found = HashMap::with_capacity(pending.len());
        for (key, outcome) in join_all(pending).await {
            if let Some(value) = outcome? {
                found.insert(key, value);
            }
        }
        Ok(found)
    }

    /// Dispatch every undispatched batch, one fetch call each
    ///
    /// Each fetch runs on its own task, so dropping the returned future only
    /// stops waiting: dispatched batches still complete and resolve their
    /// waiters. Returns once all of them have been resolved.
    pub async fn flush(&self) {
        let batches: Vec<_> = self.shared.state.lock().queued.drain(..).collect();
        if batches.is_empty() {
            return;
        }

        let store = Arc::clone(&self.shared.store);
        let weak = Arc::downgrade(&self.shared);
        let tasks: Vec<_> = batches
            .into_iter()
            .map(|batch| {
                tokio::spawn(dispatch(weak.clone(), Arc::clone(&store), batch).in_current_span())
            })
            .collect();

        for outcome in join_all(tasks).await {
            if let Err(e) = outcome {
                warn!(error = %e, "Batch dispatch task failed");
            }
        }
    }

    /// Discard every undispatched batch without fetching
    ///
    /// Their handles resolve to [`BatchError::Cancelled`]. Returns the number
    /// of waiters that were cancelled.
    pub fn cancel(&self) -> usize {
        let dropped: Vec<_> = self.shared.state.lock().queued.drain(..).collect();
        let waiters: usize = dropped.iter().map(Batch::waiter_count).sum();
        if waiters > 0 {
            debug!(
                batches = dropped.len(),
                waiters = waiters,
                "Cancelled undispatched batches"
            );
        }
        waiters
    }

    /// Seed the request cache with a known value
    ///
    /// Has no effect when caching is disabled.
    pub fn prime(&self, key: K, value: S::Value) {
        if self.shared.options.caching {
            self.shared.state.lock().cache.insert(key, value);
        }
    }

    /// Forget every cached value
    pub fn clear_cache(&self) {
        self.shared.state.lock().cache.clear();
    }

    /// Number of batches waiting to be dispatched
    pub fn pending_batches(&self) -> usize {
        self.shared.state.lock().queued.len()
    }

    /// Number of values held in the request cache
    pub fn cached_len(&self) -> usize {
        self.shared.state.lock().cache.len()
    }

    fn schedule(&self, batch_id: u64) {
        let weak = Arc::downgrade(&self.shared);
        let flush = ScheduledFlush::new(batch_id, move || async move {
            let Some(shared) = weak.upgrade() else {
                trace!(batch_id = batch_id, "Resolver dropped before scheduled flush");
                return;
            };
            let Some(batch) = shared.state.lock().take_batch(batch_id) else {
                trace!(batch_id = batch_id, "Batch already flushed");
                return;
            };
            let store = Arc::clone(&shared.store);
            drop(shared);

            dispatch(weak, store, batch).await;
        });
        self.shared.scheduler.schedule(flush);
    }
}

impl<K: BatchKey, S: BatchStore<K>> Drop for BatchResolver<K, S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Run one fetch for `batch` and resolve all of its waiters
///
/// Owns everything it needs, so a dispatched batch completes even if the
/// resolver is dropped meanwhile; the cache is only updated if it is not.
async fn dispatch<K, S>(
    shared: Weak<Shared<K, S>>,
    store: Arc<S>,
    batch: Batch<K, S::Value, S::Error>,
) where
    K: BatchKey,
    S: BatchStore<K>,
{
    let batch_id = batch.id;
    debug!(
        batch_id = batch_id,
        keys = batch.keys.len(),
        waiters = batch.waiter_count(),
        "Dispatching batch"
    );

    match store.fetch(&batch.keys).await {
        Ok(values) => {
            if let Some(shared) = shared.upgrade() {
                if shared.options.caching {
                    let mut state = shared.state.lock();
                    for (key, value) in &values {
                        if batch.contains(key) {
                            state.cache.insert(key.clone(), value.clone());
                        }
                    }
                }
            }
            let missing = batch.resolve(values);
            debug!(batch_id = batch_id, missing = missing, "Batch resolved");
        }
        Err(err) => {
            warn!(batch_id = batch_id, error = %err, "Batch fetch failed");
            batch.fail(Arc::new(err));
        }
    }
}

/// Handle to the outcome of one [`BatchResolver::request`]
///
/// Resolves to `Ok(Some(value))`, `Ok(None)` when the key was not found, or
/// a [`BatchError`].
#[must_use = "a pending load does nothing unless awaited"]
pub struct PendingLoad<V, E> {
    state: PendingState<V, E>,
}

enum PendingState<V, E> {
    Ready(Option<LoadResult<V, E>>),
    Waiting(oneshot::Receiver<LoadResult<V, E>>),
}

impl<V, E> PendingLoad<V, E> {
    fn ready(outcome: LoadResult<V, E>) -> Self {
        Self {
            state: PendingState::Ready(Some(outcome)),
        }
    }

    fn waiting(rx: oneshot::Receiver<LoadResult<V, E>>) -> Self {
        Self {
            state: PendingState::Waiting(rx),
        }
    }
}

// Fields are never pinned structurally.
impl<V, E> Unpin for PendingLoad<V, E> {}

impl<V, E> Future for PendingLoad<V, E> {
    type Output = LoadResult<V, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            PendingState::Ready(outcome) => {
                Poll::Ready(outcome.take().unwrap_or(Err(BatchError::Cancelled)))
            }
            // A dropped sender means the batch was discarded before dispatch.
            PendingState::Waiting(rx) => Pin::new(rx)
                .poll(cx)
                .map(|received| received.unwrap_or(Err(BatchError::Cancelled))),
        }
    }
}
