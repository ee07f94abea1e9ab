//! Suspend rendering until an asynchronous value settles.
//!
//! A render pass reads a [`Promise`] through a [`PromiseCache`]. The first
//! read registers the promise and suspends with a [`Settled`] future; the
//! host awaits it and retries the render. Later reads return the cached
//! outcome:
//!
//! ```rust,ignore
//! match cache.read(&promise) {
//!     Read::Ready(value) => render(value),
//!     Read::Suspended(settled) => spawn_local(async move {
//!         settled.await;
//!         rerender();
//!     }),
//!     Read::Failed(error) => show_error(error),
//! }
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, Weak};
use std::task::{Context, Poll};

use futures::future::{BoxFuture, FutureExt, Shared};

use crate::error::ProvisionError;

/// Outcome of a promise. Errors are shared so every reader can see them.
pub type PromiseResult<T> = Result<T, Arc<anyhow::Error>>;

/// Stable identity of a [`Promise`], shared by its clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PromiseId(u64);

impl PromiseId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A cloneable handle to an asynchronous value.
///
/// The wrapped future runs at most once no matter how many clones or
/// caches await it.
pub struct Promise<T> {
    id: PromiseId,
    future: Shared<BoxFuture<'static, PromiseResult<T>>>,
    handle: Arc<()>,
}

impl<T: Clone + Send + Sync + 'static> Promise<T> {
    /// Wrap a future.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let future = async move { future.await.map_err(Arc::new) }
            .boxed()
            .shared();

        Self {
            id: PromiseId::next(),
            future,
            handle: Arc::new(()),
        }
    }

    /// A promise that resolves to `value`.
    pub fn resolved(value: T) -> Self {
        Self::new(async move { Ok(value) })
    }

    /// A promise that rejects with `error`.
    pub fn rejected(error: anyhow::Error) -> Self {
        Self::new(async move { Err(error) })
    }
}

impl<T> Promise<T> {
    /// The promise's identity.
    pub fn id(&self) -> PromiseId {
        self.id
    }
}

impl<T: Clone> Future for Promise<T> {
    type Output = PromiseResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.poll_unpin(cx)
    }
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            future: self.future.clone(),
            handle: Arc::clone(&self.handle),
        }
    }
}

impl<T> std::fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Promise").field("id", &self.id).finish()
    }
}

/// Settlement state recorded for a promise.
#[derive(Debug, Clone)]
pub enum PromiseState<T> {
    Pending,
    Resolved(T),
    Rejected(Arc<anyhow::Error>),
}

/// Completes once the promise behind a suspension has settled.
///
/// Awaiting it is the host's retry registration: it drives the promise and
/// records the outcome in the cache entry exactly once.
#[derive(Clone)]
pub struct Settled(Shared<BoxFuture<'static, ()>>);

impl Future for Settled {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.0.poll_unpin(cx)
    }
}

impl std::fmt::Debug for Settled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Settled").finish()
    }
}

/// Result of reading a promise during a render pass.
#[derive(Debug)]
pub enum Read<T> {
    /// The promise resolved.
    Ready(T),
    /// Still pending. Retry once the future completes.
    Suspended(Settled),
    /// The promise rejected.
    Failed(Arc<anyhow::Error>),
}

/// Result of a render that may suspend.
#[derive(Debug)]
pub enum Rendered<V> {
    /// Rendered output.
    View(V),
    /// Waiting on an asynchronous value. Retry once the future completes.
    Suspended(Settled),
}

impl<V> Rendered<V> {
    /// The rendered output, if not suspended.
    pub fn view(self) -> Option<V> {
        match self {
            Self::View(view) => Some(view),
            Self::Suspended(_) => None,
        }
    }

    pub fn is_suspended(&self) -> bool {
        matches!(self, Self::Suspended(_))
    }
}

struct Entry<T> {
    state: Arc<Mutex<PromiseState<T>>>,
    settled: Settled,
}

impl<T: Clone + Send + Sync + 'static> Entry<T> {
    fn new(promise: &Promise<T>) -> Self {
        let state = Arc::new(Mutex::new(PromiseState::Pending));
        let id = promise.id;
        let future = promise.future.clone();
        let recorder = Arc::clone(&state);

        let settled = async move {
            let outcome = future.await;
            let next = match outcome {
                Ok(value) => {
                    tracing::debug!(promise = id.0, "promise resolved");
                    PromiseState::Resolved(value)
                }
                Err(error) => {
                    tracing::warn!(promise = id.0, error = %error, "promise rejected");
                    PromiseState::Rejected(error)
                }
            };
            *lock(&recorder) = next;
        }
        .boxed()
        .shared();

        Self {
            state,
            settled: Settled(settled),
        }
    }

    fn read(&self) -> Read<T> {
        match &*lock(&self.state) {
            PromiseState::Pending => Read::Suspended(self.settled.clone()),
            PromiseState::Resolved(value) => Read::Ready(value.clone()),
            PromiseState::Rejected(error) => Read::Failed(Arc::clone(error)),
        }
    }
}

struct Slot {
    alive: Weak<()>,
    entry: Arc<dyn Any + Send + Sync>,
}

/// Settlement states keyed by promise identity.
///
/// Entries live until evicted or until every handle to their promise is
/// dropped, after which [`prune`](Self::prune) (also run whenever a new
/// promise is registered) removes them.
#[derive(Default)]
pub struct PromiseCache {
    slots: Mutex<HashMap<PromiseId, Slot>>,
}

impl PromiseCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache used by [`use_promise`].
    pub fn global() -> &'static PromiseCache {
        static GLOBAL: OnceLock<PromiseCache> = OnceLock::new();
        GLOBAL.get_or_init(PromiseCache::new)
    }

    /// Read a promise, registering it on first access.
    pub fn read<T: Clone + Send + Sync + 'static>(&self, promise: &Promise<T>) -> Read<T> {
        let read = self.entry(promise).read();
        if matches!(read, Read::Suspended(_)) {
            tracing::trace!(promise = promise.id.0, "suspending on pending promise");
        }
        read
    }

    /// Current state of a registered promise.
    pub fn state<T: Clone + Send + Sync + 'static>(
        &self,
        promise: &Promise<T>,
    ) -> Option<PromiseState<T>> {
        let entry = self.existing::<T>(promise.id)?;
        let state = lock(&entry.state).clone();
        Some(state)
    }

    /// Whether the promise has been registered.
    pub fn contains(&self, id: PromiseId) -> bool {
        self.slots().contains_key(&id)
    }

    /// Drop the entry for a promise. Returns whether one existed.
    pub fn evict(&self, id: PromiseId) -> bool {
        self.slots().remove(&id).is_some()
    }

    /// Drop entries whose promises are no longer referenced. Returns how
    /// many were removed.
    pub fn prune(&self) -> usize {
        prune_slots(&mut self.slots())
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.slots().clear();
    }

    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }

    fn existing<T: Clone + Send + Sync + 'static>(&self, id: PromiseId) -> Option<Arc<Entry<T>>> {
        let entry = Arc::clone(&self.slots().get(&id)?.entry);
        entry.downcast::<Entry<T>>().ok()
    }

    fn entry<T: Clone + Send + Sync + 'static>(&self, promise: &Promise<T>) -> Arc<Entry<T>> {
        let mut slots = self.slots();

        if let Some(slot) = slots.get(&promise.id) {
            if let Ok(entry) = Arc::clone(&slot.entry).downcast::<Entry<T>>() {
                return entry;
            }
        }

        let removed = prune_slots(&mut slots);
        if removed > 0 {
            tracing::trace!(removed, "pruned settled promises");
        }

        let entry = Arc::new(Entry::new(promise));
        slots.insert(
            promise.id,
            Slot {
                alive: Arc::downgrade(&promise.handle),
                entry: entry.clone(),
            },
        );
        entry
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<PromiseId, Slot>> {
        lock(&self.slots)
    }
}

impl std::fmt::Debug for PromiseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromiseCache")
            .field("entries", &self.len())
            .finish()
    }
}

fn prune_slots(slots: &mut HashMap<PromiseId, Slot>) -> usize {
    let before = slots.len();
    slots.retain(|_, slot| slot.alive.strong_count() > 0);
    before - slots.len()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Read a promise through the process-wide cache.
pub fn use_promise<T: Clone + Send + Sync + 'static>(promise: &Promise<T>) -> Read<T> {
    PromiseCache::global().read(promise)
}

/// Holds the promise built for the latest dependencies.
///
/// Keep one per call site across renders. A new promise is built only when
/// the dependencies differ from the previous call.
pub struct PromiseMemo<D, T> {
    slot: Mutex<Option<(D, Promise<T>)>>,
}

impl<D: PartialEq, T> PromiseMemo<D, T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// The memoized promise for `deps`, calling `make` when they changed.
    pub fn promise(&self, deps: D, make: impl FnOnce() -> Promise<T>) -> Promise<T> {
        let mut slot = lock(&self.slot);
        if let Some((current, promise)) = slot.as_ref() {
            if *current == deps {
                return promise.clone();
            }
        }

        let promise = make();
        tracing::trace!(promise = promise.id.0, "dependencies changed, new promise");
        *slot = Some((deps, promise.clone()));
        promise
    }
}

impl<D: PartialEq, T> Default for PromiseMemo<D, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, T> std::fmt::Debug for PromiseMemo<D, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let current = lock(&self.slot).as_ref().map(|(_, promise)| promise.id);
        f.debug_struct("PromiseMemo").field("current", &current).finish()
    }
}

/// Build a promise with `make` when `deps` change, then read it through
/// `cache`.
pub fn use_promise_fn<D, T>(
    cache: &PromiseCache,
    memo: &PromiseMemo<D, T>,
    deps: D,
    make: impl FnOnce() -> Promise<T>,
) -> Read<T>
where
    D: PartialEq,
    T: Clone + Send + Sync + 'static,
{
    cache.read(&memo.promise(deps, make))
}

/// Render `children` with the settled value of `promise`.
///
/// Suspends while pending and fails with [`ProvisionError::Rejected`] once
/// the promise has rejected.
pub fn resolve_promise<T, V>(
    cache: &PromiseCache,
    promise: &Promise<T>,
    children: impl FnOnce(T) -> V,
) -> Result<Rendered<V>, ProvisionError>
where
    T: Clone + Send + Sync + 'static,
{
    match cache.read(promise) {
        Read::Ready(value) => Ok(Rendered::View(children(value))),
        Read::Suspended(settled) => Ok(Rendered::Suspended(settled)),
        Read::Failed(error) => Err(ProvisionError::Rejected(error)),
    }
}
