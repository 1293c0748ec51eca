//! The instrumented store: operation strategies plus event choreography.

use std::sync::{Arc, RwLock};

use keyfan_core::{
    DeleteError, DeleteEvents, Event, InsertError, InsertEvents, QueryError, QueryEvents,
    QueryResult, UpdateError, UpdateEvents,
};
use keyfan_dispatch::{EventDispatcher, NoopDispatcher};
use tracing::trace;

use crate::traits::{Deleter, Inserter, Queryer, Updater};

/// A key-value operation unit with its own event-producing behavior.
///
/// A store owns one optional strategy per operation kind, an append-only list
/// of persistent event producers per operation kind, and a single swappable
/// dispatcher (no-op by default). Every operation is wrapped in the same
/// choreography:
///
/// 1. start events from persistent producers, then call-scoped ones
/// 2. the strategy runs
/// 3. on success, end events from call-scoped producers, then persistent
///    ones; on failure, failed events in that same order, then the typed
///    error propagates
///
/// The reversed producer order on the way out is part of the contract:
/// call-scoped producers see the outcome first. A call never observes both
/// an end and a failed event.
///
/// An operation whose strategy slot is empty fails up front with the typed
/// error's `unsupported` variant, before any event is emitted.
pub struct Store<K, V> {
    inserter: Option<Arc<dyn Inserter<K, V>>>,
    queryer: Option<Arc<dyn Queryer<K, V>>>,
    updater: Option<Arc<dyn Updater<K, V>>>,
    deleter: Option<Arc<dyn Deleter<K, V>>>,
    producers: Producers<K, V>,
    dispatcher: RwLock<Arc<dyn EventDispatcher<K, V>>>,
}

/// Persistent producer lists, one per operation kind. Append-only: producers
/// are added, never replaced or removed, and every registered producer of a
/// kind fires on every call of that kind.
struct Producers<K, V> {
    insert: RwLock<Vec<Arc<dyn InsertEvents<K, V>>>>,
    query: RwLock<Vec<Arc<dyn QueryEvents<K, V>>>>,
    update: RwLock<Vec<Arc<dyn UpdateEvents<K, V>>>>,
    delete: RwLock<Vec<Arc<dyn DeleteEvents<K, V>>>>,
}

impl<K, V> Default for Producers<K, V> {
    fn default() -> Self {
        Self {
            insert: RwLock::new(Vec::new()),
            query: RwLock::new(Vec::new()),
            update: RwLock::new(Vec::new()),
            delete: RwLock::new(Vec::new()),
        }
    }
}

impl<K, V> Store<K, V>
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Start building a store.
    pub fn builder() -> StoreBuilder<K, V> {
        StoreBuilder::new()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a value, returning the key it was stored under.
    ///
    /// `extras` are call-scoped producers consulted for this call only, after
    /// (on start) or before (on end/failed) the persistent ones.
    pub async fn insert(
        &self,
        value: V,
        extras: &[Arc<dyn InsertEvents<K, V>>],
    ) -> Result<K, InsertError> {
        let inserter = self.inserter.clone().ok_or_else(InsertError::unsupported)?;
        let persistent = self.producers.insert.read().unwrap().clone();

        for producer in persistent.iter().chain(extras) {
            self.emit(producer.start(&value));
        }
        match inserter.insert(&value).await {
            Ok(key) => {
                for producer in extras.iter().chain(&persistent) {
                    self.emit(producer.end(&key, &value));
                }
                Ok(key)
            }
            Err(error) => {
                for producer in extras.iter().chain(&persistent) {
                    self.emit(producer.failed(&value, &error));
                }
                Err(error)
            }
        }
    }

    /// Query the values stored under a key.
    pub async fn query(
        &self,
        key: K,
        extras: &[Arc<dyn QueryEvents<K, V>>],
    ) -> Result<QueryResult<V>, QueryError> {
        let queryer = self.queryer.clone().ok_or_else(QueryError::unsupported)?;
        let persistent = self.producers.query.read().unwrap().clone();

        for producer in persistent.iter().chain(extras) {
            self.emit(producer.start(&key));
        }
        match queryer.query(&key).await {
            Ok(result) => {
                for producer in extras.iter().chain(&persistent) {
                    self.emit(producer.end(&key));
                }
                Ok(result)
            }
            Err(error) => {
                for producer in extras.iter().chain(&persistent) {
                    self.emit(producer.failed(&key, &error));
                }
                Err(error)
            }
        }
    }

    /// Update the value(s) under a key, returning the affected count.
    pub async fn update(
        &self,
        key: K,
        value: V,
        extras: &[Arc<dyn UpdateEvents<K, V>>],
    ) -> Result<u64, UpdateError> {
        let updater = self.updater.clone().ok_or_else(UpdateError::unsupported)?;
        let persistent = self.producers.update.read().unwrap().clone();

        for producer in persistent.iter().chain(extras) {
            self.emit(producer.start(&key, &value));
        }
        match updater.update(&key, &value).await {
            Ok(count) => {
                for producer in extras.iter().chain(&persistent) {
                    self.emit(producer.end(&key, &value, count));
                }
                Ok(count)
            }
            Err(error) => {
                for producer in extras.iter().chain(&persistent) {
                    self.emit(producer.failed(&key, &value, &error));
                }
                Err(error)
            }
        }
    }

    /// Delete the value(s) under a key, returning the affected count.
    pub async fn delete(
        &self,
        key: K,
        extras: &[Arc<dyn DeleteEvents<K, V>>],
    ) -> Result<u64, DeleteError> {
        let deleter = self.deleter.clone().ok_or_else(DeleteError::unsupported)?;
        let persistent = self.producers.delete.read().unwrap().clone();

        for producer in persistent.iter().chain(extras) {
            self.emit(producer.start(&key));
        }
        match deleter.delete(&key).await {
            Ok(count) => {
                for producer in extras.iter().chain(&persistent) {
                    self.emit(producer.end(&key, count));
                }
                Ok(count)
            }
            Err(error) => {
                for producer in extras.iter().chain(&persistent) {
                    self.emit(producer.failed(&key, &error));
                }
                Err(error)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Producer & dispatcher management
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a persistent producer for insert calls.
    pub fn add_insert_producer(&self, producer: Arc<dyn InsertEvents<K, V>>) {
        self.producers.insert.write().unwrap().push(producer);
    }

    /// Append a persistent producer for query calls.
    pub fn add_query_producer(&self, producer: Arc<dyn QueryEvents<K, V>>) {
        self.producers.query.write().unwrap().push(producer);
    }

    /// Append a persistent producer for update calls.
    pub fn add_update_producer(&self, producer: Arc<dyn UpdateEvents<K, V>>) {
        self.producers.update.write().unwrap().push(producer);
    }

    /// Append a persistent producer for delete calls.
    pub fn add_delete_producer(&self, producer: Arc<dyn DeleteEvents<K, V>>) {
        self.producers.delete.write().unwrap().push(producer);
    }

    /// Replace the active dispatcher. `None` is normalized to the no-op
    /// dispatcher.
    pub fn set_dispatcher(&self, dispatcher: Option<Arc<dyn EventDispatcher<K, V>>>) {
        let dispatcher = dispatcher.unwrap_or_else(|| Arc::new(NoopDispatcher));
        *self.dispatcher.write().unwrap() = dispatcher;
    }

    /// The active dispatcher.
    pub fn dispatcher(&self) -> Arc<dyn EventDispatcher<K, V>> {
        Arc::clone(&self.dispatcher.read().unwrap())
    }

    /// Forward a produced event (if any) to the active dispatcher.
    /// Fire-and-forget: subscriber outcomes are never inspected.
    fn emit(&self, event: Option<Event<K, V>>) {
        if let Some(event) = event {
            trace!(kind = %event.kind(), "emitting event");
            // Clone out of the lock so subscribers can swap the dispatcher.
            let dispatcher = Arc::clone(&self.dispatcher.read().unwrap());
            dispatcher.dispatch(event);
        }
    }
}

/// Builder for [`Store`]. Strategy slots left unset stay absent; the
/// matching operations then fail with their `unsupported` error.
pub struct StoreBuilder<K, V> {
    inserter: Option<Arc<dyn Inserter<K, V>>>,
    queryer: Option<Arc<dyn Queryer<K, V>>>,
    updater: Option<Arc<dyn Updater<K, V>>>,
    deleter: Option<Arc<dyn Deleter<K, V>>>,
    dispatcher: Option<Arc<dyn EventDispatcher<K, V>>>,
}

impl<K, V> StoreBuilder<K, V>
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inserter: None,
            queryer: None,
            updater: None,
            deleter: None,
            dispatcher: None,
        }
    }

    pub fn inserter(mut self, inserter: Arc<dyn Inserter<K, V>>) -> Self {
        self.inserter = Some(inserter);
        self
    }

    pub fn queryer(mut self, queryer: Arc<dyn Queryer<K, V>>) -> Self {
        self.queryer = Some(queryer);
        self
    }

    pub fn updater(mut self, updater: Arc<dyn Updater<K, V>>) -> Self {
        self.updater = Some(updater);
        self
    }

    pub fn deleter(mut self, deleter: Arc<dyn Deleter<K, V>>) -> Self {
        self.deleter = Some(deleter);
        self
    }

    /// Install one backend into all four strategy slots.
    pub fn backend<B>(self, backend: Arc<B>) -> Self
    where
        B: Inserter<K, V> + Queryer<K, V> + Updater<K, V> + Deleter<K, V> + 'static,
    {
        self.inserter(backend.clone())
            .queryer(backend.clone())
            .updater(backend.clone())
            .deleter(backend)
    }

    pub fn dispatcher(mut self, dispatcher: Arc<dyn EventDispatcher<K, V>>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn build(self) -> Store<K, V> {
        Store {
            inserter: self.inserter,
            queryer: self.queryer,
            updater: self.updater,
            deleter: self.deleter,
            producers: Producers::default(),
            dispatcher: RwLock::new(
                self.dispatcher.unwrap_or_else(|| Arc::new(NoopDispatcher)),
            ),
        }
    }
}

impl<K, V> Default for StoreBuilder<K, V>
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use keyfan_core::{EventKind, LifecycleProducer, OpKind, Phase};
    use keyfan_dispatch::Subscriber;
    use std::sync::Mutex;

    /// Dispatcher that records every event it is handed.
    struct Recorder {
        events: Mutex<Vec<Event<String, String>>>,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                events: Mutex::new(Vec::new()),
            })
        }

        fn kinds(&self) -> Vec<EventKind> {
            self.events.lock().unwrap().iter().map(Event::kind).collect()
        }
    }

    impl EventDispatcher<String, String> for Recorder {
        fn dispatch(&self, event: Event<String, String>) {
            self.events.lock().unwrap().push(event);
        }

        fn register(&self, _subscriber: Arc<dyn Subscriber<String, String>>) {}

        fn unregister(&self, _subscriber: &Arc<dyn Subscriber<String, String>>) {}
    }

    /// Producer that logs which hook fired under which tag, producing no
    /// events itself.
    struct Probe {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Probe {
        fn new(tag: &'static str, log: Arc<Mutex<Vec<String>>>) -> Arc<Self> {
            Arc::new(Self { tag, log })
        }

        fn record(&self, phase: &str) {
            self.log.lock().unwrap().push(format!("{}:{}", self.tag, phase));
        }
    }

    impl InsertEvents<String, String> for Probe {
        fn start(&self, _value: &String) -> Option<Event<String, String>> {
            self.record("start");
            None
        }

        fn end(&self, _key: &String, _value: &String) -> Option<Event<String, String>> {
            self.record("end");
            None
        }

        fn failed(
            &self,
            _value: &String,
            _error: &InsertError,
        ) -> Option<Event<String, String>> {
            self.record("failed");
            None
        }
    }

    struct FailingDeleter;

    #[async_trait::async_trait]
    impl Deleter<String, String> for FailingDeleter {
        async fn delete(&self, _key: &String) -> Result<u64, DeleteError> {
            Err(DeleteError::new("backend rejected the delete"))
        }
    }

    fn first_word(value: &String) -> String {
        value.split(' ').next().unwrap_or("").to_string()
    }

    fn memory_store() -> Store<String, String> {
        Store::builder()
            .backend(Arc::new(MemoryBackend::new(first_word)))
            .build()
    }

    #[tokio::test]
    async fn test_round_trip() {
        let store = memory_store();

        let key = store.insert("alpha one".to_string(), &[]).await.unwrap();
        assert_eq!(key, "alpha");

        let result = store.query(key.clone(), &[]).await.unwrap();
        assert_eq!(result.collect_remaining(), vec!["alpha one".to_string()]);

        assert_eq!(store.delete(key.clone(), &[]).await.unwrap(), 1);
        let result = store.query(key.clone(), &[]).await.unwrap();
        assert!(result.collect_remaining().is_empty());
        assert_eq!(store.delete(key, &[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_start_and_end_producer_order_is_mirrored() {
        let store = memory_store();
        let log = Arc::new(Mutex::new(Vec::new()));
        let persistent = Probe::new("p", Arc::clone(&log));
        let call_scoped = Probe::new("q", Arc::clone(&log));

        store.add_insert_producer(persistent);
        let extras: Vec<Arc<dyn InsertEvents<String, String>>> = vec![call_scoped];
        store.insert("v".to_string(), &extras).await.unwrap();

        // Start runs persistent-then-call-scoped, end runs the reverse.
        assert_eq!(
            *log.lock().unwrap(),
            vec!["p:start", "q:start", "q:end", "p:end"]
        );
    }

    #[tokio::test]
    async fn test_failed_path_emits_no_end() {
        let store = Store::builder()
            .deleter(Arc::new(FailingDeleter) as Arc<dyn Deleter<String, String>>)
            .build();
        let recorder = Recorder::new();
        store.set_dispatcher(Some(
            recorder.clone() as Arc<dyn EventDispatcher<String, String>>
        ));
        store.add_delete_producer(Arc::new(LifecycleProducer));

        let err = store.delete("k".to_string(), &[]).await.unwrap_err();
        assert!(err.message().contains("rejected"));

        assert_eq!(
            recorder.kinds(),
            vec![
                EventKind::new(OpKind::Delete, Phase::Start),
                EventKind::new(OpKind::Delete, Phase::Failed),
            ]
        );
    }

    #[tokio::test]
    async fn test_all_producers_of_a_kind_fire() {
        let store = memory_store();
        let recorder = Recorder::new();
        store.set_dispatcher(Some(
            recorder.clone() as Arc<dyn EventDispatcher<String, String>>
        ));
        store.add_insert_producer(Arc::new(LifecycleProducer));
        store.add_insert_producer(Arc::new(LifecycleProducer));

        store.insert("v".to_string(), &[]).await.unwrap();

        // Two producers, each yielding a start and an end.
        assert_eq!(
            recorder.kinds(),
            vec![
                EventKind::new(OpKind::Insert, Phase::Start),
                EventKind::new(OpKind::Insert, Phase::Start),
                EventKind::new(OpKind::Insert, Phase::End),
                EventKind::new(OpKind::Insert, Phase::End),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_strategy_fails_before_any_event() {
        let store: Store<String, String> = Store::builder().build();
        let recorder = Recorder::new();
        store.set_dispatcher(Some(
            recorder.clone() as Arc<dyn EventDispatcher<String, String>>
        ));
        store.add_update_producer(Arc::new(LifecycleProducer));

        let err = store
            .update("k".to_string(), "v".to_string(), &[])
            .await
            .unwrap_err();
        assert!(err.message().contains("no update strategy"));
        assert!(recorder.kinds().is_empty());
    }

    #[tokio::test]
    async fn test_set_dispatcher_none_normalizes_to_noop() {
        let store = memory_store();
        store.add_insert_producer(Arc::new(LifecycleProducer));
        store.set_dispatcher(None);
        // Events are produced and silently dropped.
        store.insert("v".to_string(), &[]).await.unwrap();
    }
}
