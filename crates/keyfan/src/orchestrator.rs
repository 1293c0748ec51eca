//! Segment fan-out over registered stores.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use keyfan_core::{
    AsyncResult, DeleteEvents, ExecutionContext, ExecutionContextExt, InsertEvents, OpKind,
    QueryEvents, QueryResult, TokioContext, UpdateEvents,
};
use keyfan_store::Store;
use tokio::sync::oneshot;
use tracing::{debug, trace};

use crate::error::{OpFailure, Slot};

/// The segment used when a caller has no reason to name one.
pub const DEFAULT_SEGMENT: &str = "default";

/// Execution contexts for an [`Orchestrator`].
///
/// Both default to the calling task's tokio runtime. Inject a
/// [`SerialContext`](keyfan_core::SerialContext) as `kickoff` to strictly
/// serialize fan-out chains across calls; the default runs each call's chain
/// as its own task, which keeps independent calls from queueing behind each
/// other while per-call ordering is still enforced by the chain itself.
#[derive(Clone)]
pub struct OrchestratorConfig {
    /// Where fan-out driver chains run.
    pub kickoff: Arc<dyn ExecutionContext>,
    /// The context bound to stores registered without an explicit one.
    pub default_context: Arc<dyn ExecutionContext>,
}

impl Default for OrchestratorConfig {
    /// # Panics
    /// Panics when called outside a tokio runtime.
    fn default() -> Self {
        Self {
            kickoff: Arc::new(TokioContext::current()),
            default_context: Arc::new(TokioContext::current()),
        }
    }
}

/// One registered store and the context its operations run on.
struct Binding<K, V> {
    store: Arc<Store<K, V>>,
    context: Arc<dyn ExecutionContext>,
}

impl<K, V> Clone for Binding<K, V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            context: Arc::clone(&self.context),
        }
    }
}

type OpFuture<T> = Pin<Box<dyn Future<Output = Slot<T>> + Send + 'static>>;

/// Fans each logical operation out across every store registered under a
/// segment, in registration order, and aggregates per-store slots into one
/// non-blocking [`AsyncResult`].
///
/// Ordering is enforced by the chain, not by completion time: store i+1's
/// operation is submitted to its context only after store i's task finished,
/// so slots always line up with registration order even when the stores run
/// on independently scheduled contexts. A store's failure fills its slot and
/// never halts or skips the stores after it.
///
/// Entry points never block: they snapshot the segment under the registry
/// lock, hand the chain to the kickoff context, and return the pending
/// handle immediately. Cancelling the handle only changes what waiters
/// observe; queued and in-flight store operations run to completion.
pub struct Orchestrator<K, V> {
    registry: Mutex<HashMap<String, Vec<Binding<K, V>>>>,
    config: OrchestratorConfig,
}

impl<K, V> Orchestrator<K, V>
where
    K: Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(config: OrchestratorConfig) -> Self {
        Self {
            registry: Mutex::new(HashMap::new()),
            config,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a store under a segment, bound to the configured default
    /// context. Entries append in call order and are never removed.
    pub fn add_store(&self, segment: &str, store: Arc<Store<K, V>>) {
        self.add_store_on(segment, store, Arc::clone(&self.config.default_context));
    }

    /// Register a store under a segment, bound to an explicit context.
    pub fn add_store_on(
        &self,
        segment: &str,
        store: Arc<Store<K, V>>,
        context: Arc<dyn ExecutionContext>,
    ) {
        let mut registry = self.registry.lock().unwrap();
        let bindings = registry.entry(segment.to_string()).or_default();
        bindings.push(Binding { store, context });
        trace!(segment, stores = bindings.len(), "store registered");
    }

    /// Number of stores registered under a segment.
    pub fn store_count(&self, segment: &str) -> usize {
        self.registry
            .lock()
            .unwrap()
            .get(segment)
            .map(Vec::len)
            .unwrap_or(0)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fan-out operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert `value` into every store of `segment`.
    pub fn insert(
        &self,
        segment: &str,
        value: V,
        extras: Vec<Arc<dyn InsertEvents<K, V>>>,
    ) -> AsyncResult<Vec<Slot<K>>> {
        self.fan_out(OpKind::Insert, segment, move |store| {
            let value = value.clone();
            let extras = extras.clone();
            Box::pin(async move { store.insert(value, &extras).await.map_err(OpFailure::from) })
        })
    }

    /// Query `key` in every store of `segment`.
    pub fn query(
        &self,
        segment: &str,
        key: K,
        extras: Vec<Arc<dyn QueryEvents<K, V>>>,
    ) -> AsyncResult<Vec<Slot<QueryResult<V>>>> {
        self.fan_out(OpKind::Query, segment, move |store| {
            let key = key.clone();
            let extras = extras.clone();
            Box::pin(async move { store.query(key, &extras).await.map_err(OpFailure::from) })
        })
    }

    /// Update `key` to `value` in every store of `segment`.
    pub fn update(
        &self,
        segment: &str,
        key: K,
        value: V,
        extras: Vec<Arc<dyn UpdateEvents<K, V>>>,
    ) -> AsyncResult<Vec<Slot<u64>>> {
        self.fan_out(OpKind::Update, segment, move |store| {
            let key = key.clone();
            let value = value.clone();
            let extras = extras.clone();
            Box::pin(async move {
                store
                    .update(key, value, &extras)
                    .await
                    .map_err(OpFailure::from)
            })
        })
    }

    /// Delete `key` from every store of `segment`.
    pub fn delete(
        &self,
        segment: &str,
        key: K,
        extras: Vec<Arc<dyn DeleteEvents<K, V>>>,
    ) -> AsyncResult<Vec<Slot<u64>>> {
        self.fan_out(OpKind::Delete, segment, move |store| {
            let key = key.clone();
            let extras = extras.clone();
            Box::pin(async move { store.delete(key, &extras).await.map_err(OpFailure::from) })
        })
    }

    /// The shared chain driver. Snapshots the segment, then walks the
    /// bindings as an explicit work-list: each store's operation is submitted
    /// to that store's context and awaited through a oneshot before the next
    /// link is submitted. An unknown segment is an empty list, so the handle
    /// completes immediately with no slots.
    fn fan_out<T, F>(&self, op: OpKind, segment: &str, make: F) -> AsyncResult<Vec<Slot<T>>>
    where
        T: Send + Sync + 'static,
        F: Fn(Arc<Store<K, V>>) -> OpFuture<T> + Send + 'static,
    {
        let bindings = self
            .registry
            .lock()
            .unwrap()
            .get(segment)
            .cloned()
            .unwrap_or_default();

        let (handle, completer) = AsyncResult::pending();
        let total = bindings.len();
        trace!(%op, segment, stores = total, "fan-out started");

        self.config.kickoff.spawn(async move {
            let mut slots = Vec::with_capacity(total);
            for (index, binding) in bindings.into_iter().enumerate() {
                let (done_tx, done_rx) = oneshot::channel();
                let operation = make(Arc::clone(&binding.store));
                binding.context.spawn(async move {
                    let _ = done_tx.send(operation.await);
                });
                let slot = match done_rx.await {
                    Ok(slot) => slot,
                    Err(_) => Err(OpFailure::dropped(op)),
                };
                if let Err(failure) = &slot {
                    debug!(%op, index, %failure, "fan-out slot failed");
                }
                slots.push(slot);
            }
            trace!(%op, stores = total, "fan-out complete");
            completer.complete(slots);
        });

        handle
    }
}
