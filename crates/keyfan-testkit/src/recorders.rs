//! Recording doubles for dispatchers, subscribers, and producers.

use std::sync::{Arc, Mutex};

use keyfan_core::{
    DeleteError, DeleteEvents, Event, EventKind, InsertError, InsertEvents, QueryError,
    QueryEvents, UpdateError, UpdateEvents,
};
use keyfan_dispatch::{EventDispatcher, Subscriber};

/// A dispatcher that records every event it is handed, in arrival order.
///
/// Registrations are accepted and ignored; install this on a store to
/// observe the exact event stream an operation emits.
pub struct RecordingDispatcher<K, V> {
    events: Mutex<Vec<Event<K, V>>>,
}

impl<K, V> RecordingDispatcher<K, V> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }
}

impl<K: Clone, V: Clone> RecordingDispatcher<K, V> {
    /// All recorded events, in arrival order.
    pub fn events(&self) -> Vec<Event<K, V>> {
        self.events.lock().unwrap().clone()
    }

    /// The kinds of the recorded events, in arrival order.
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().unwrap().iter().map(Event::kind).collect()
    }
}

impl<K: Send + Sync, V: Send + Sync> EventDispatcher<K, V> for RecordingDispatcher<K, V> {
    fn dispatch(&self, event: Event<K, V>) {
        self.events.lock().unwrap().push(event);
    }

    fn register(&self, _subscriber: Arc<dyn Subscriber<K, V>>) {}

    fn unregister(&self, _subscriber: &Arc<dyn Subscriber<K, V>>) {}
}

/// A subscriber that collects the events routed to it, optionally limited to
/// declared kinds.
pub struct CollectingSubscriber<K, V> {
    kinds: Vec<EventKind>,
    seen: Mutex<Vec<Event<K, V>>>,
}

impl<K, V> CollectingSubscriber<K, V> {
    /// Subscribe to all sixteen kinds.
    pub fn all() -> Arc<Self> {
        Self::for_kinds(EventKind::all().to_vec())
    }

    /// Subscribe to an explicit set of kinds.
    pub fn for_kinds(kinds: Vec<EventKind>) -> Arc<Self> {
        Arc::new(Self {
            kinds,
            seen: Mutex::new(Vec::new()),
        })
    }
}

impl<K: Clone, V: Clone> CollectingSubscriber<K, V> {
    pub fn seen(&self) -> Vec<Event<K, V>> {
        self.seen.lock().unwrap().clone()
    }
}

impl<K: Clone + Send + Sync, V: Clone + Send + Sync> Subscriber<K, V>
    for CollectingSubscriber<K, V>
{
    fn kinds(&self) -> Vec<EventKind> {
        self.kinds.clone()
    }

    fn on_event(&self, event: &Event<K, V>) {
        self.seen.lock().unwrap().push(event.clone());
    }
}

/// A producer probe: logs which hook fired under which tag and produces no
/// events. Attach one persistently and one call-scoped to pin down producer
/// ordering.
pub struct ProbeProducer {
    tag: String,
    log: Arc<Mutex<Vec<String>>>,
}

impl ProbeProducer {
    pub fn new(tag: impl Into<String>, log: Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(Self {
            tag: tag.into(),
            log,
        })
    }

    /// A fresh shared log for a group of probes.
    pub fn log() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn record(&self, op: &str, phase: &str) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}:{}", self.tag, op, phase));
    }
}

impl<K, V> InsertEvents<K, V> for ProbeProducer {
    fn start(&self, _value: &V) -> Option<Event<K, V>> {
        self.record("insert", "start");
        None
    }

    fn end(&self, _key: &K, _value: &V) -> Option<Event<K, V>> {
        self.record("insert", "end");
        None
    }

    fn failed(&self, _value: &V, _error: &InsertError) -> Option<Event<K, V>> {
        self.record("insert", "failed");
        None
    }
}

impl<K, V> QueryEvents<K, V> for ProbeProducer {
    fn start(&self, _key: &K) -> Option<Event<K, V>> {
        self.record("query", "start");
        None
    }

    fn end(&self, _key: &K) -> Option<Event<K, V>> {
        self.record("query", "end");
        None
    }

    fn failed(&self, _key: &K, _error: &QueryError) -> Option<Event<K, V>> {
        self.record("query", "failed");
        None
    }
}

impl<K, V> UpdateEvents<K, V> for ProbeProducer {
    fn start(&self, _key: &K, _value: &V) -> Option<Event<K, V>> {
        self.record("update", "start");
        None
    }

    fn end(&self, _key: &K, _value: &V, _count: u64) -> Option<Event<K, V>> {
        self.record("update", "end");
        None
    }

    fn failed(&self, _key: &K, _value: &V, _error: &UpdateError) -> Option<Event<K, V>> {
        self.record("update", "failed");
        None
    }
}

impl<K, V> DeleteEvents<K, V> for ProbeProducer {
    fn start(&self, _key: &K) -> Option<Event<K, V>> {
        self.record("delete", "start");
        None
    }

    fn end(&self, _key: &K, _count: u64) -> Option<Event<K, V>> {
        self.record("delete", "end");
        None
    }

    fn failed(&self, _key: &K, _error: &DeleteError) -> Option<Event<K, V>> {
        self.record("delete", "failed");
        None
    }
}
