//! Kind-routed publish/subscribe dispatch.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use keyfan_core::{Event, EventKind};
use tracing::trace;

use crate::{EventDispatcher, Subscriber};

/// Routes each event to the subscribers that declared its kind.
///
/// The routing table maps [`EventKind`] to an ordered subscriber list. A
/// subscriber's [`Subscriber::kinds`] is read once, at registration time;
/// changing the set it reports afterwards has no effect until it is
/// re-registered.
pub struct PubSubDispatcher<K, V> {
    table: RwLock<HashMap<EventKind, Vec<Arc<dyn Subscriber<K, V>>>>>,
}

impl<K, V> PubSubDispatcher<K, V> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(HashMap::new()),
        }
    }

    /// Number of subscribers registered for a kind.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.table
            .read()
            .unwrap()
            .get(&kind)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl<K, V> Default for PubSubDispatcher<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Send + Sync, V: Send + Sync> EventDispatcher<K, V> for PubSubDispatcher<K, V> {
    fn dispatch(&self, event: Event<K, V>) {
        let kind = event.kind();
        let matching = {
            let table = self.table.read().unwrap();
            table.get(&kind).cloned().unwrap_or_default()
        };
        trace!(%kind, subscribers = matching.len(), "pubsub dispatch");
        for subscriber in &matching {
            subscriber.on_event(&event);
        }
    }

    fn register(&self, subscriber: Arc<dyn Subscriber<K, V>>) {
        let kinds = subscriber.kinds();
        let mut table = self.table.write().unwrap();
        for kind in kinds {
            let bucket = table.entry(kind).or_default();
            if !bucket.iter().any(|s| Arc::ptr_eq(s, &subscriber)) {
                bucket.push(Arc::clone(&subscriber));
            }
        }
    }

    fn unregister(&self, subscriber: &Arc<dyn Subscriber<K, V>>) {
        let mut table = self.table.write().unwrap();
        for bucket in table.values_mut() {
            bucket.retain(|s| !Arc::ptr_eq(s, subscriber));
        }
    }
}
